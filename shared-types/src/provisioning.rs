multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::errors::MissionError;
use crate::MAX_MISSION_ID_LEN;

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct DirectoryEntry<M: ManagedTypeApi> {
    pub mission_id: ManagedBuffer<M>,
    pub client: ManagedAddress<M>,
    pub talent: ManagedAddress<M>,
    pub escrow: ManagedAddress<M>,
    pub created_on: u64,
}

impl<M: ManagedTypeApi> DirectoryEntry<M> {
    pub fn involves(&self, account: &ManagedAddress<M>) -> bool {
        &self.client == account || &self.talent == account
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProvisioningStep {
    Requested,
    Deployed,
    Initializing,
    Confirmed,
    Compensated,
}

impl ProvisioningStep {
    pub fn can_advance_to(self, next: ProvisioningStep) -> bool {
        use ProvisioningStep::*;

        matches!(
            (self, next),
            (Requested, Deployed)
                | (Deployed, Initializing)
                | (Initializing, Confirmed)
                | (Requested, Compensated)
                | (Deployed, Compensated)
                | (Initializing, Compensated)
        )
    }

    /// A compensated attempt gives its mission id back; any other step keeps it.
    pub fn reserves_id(self) -> bool {
        self != ProvisioningStep::Compensated
    }
}

/// Saga record of one `createMission` call, written before the escrow is
/// deployed and advanced at every step so a failed chain can be refunded.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct ProvisioningIntent<M: ManagedTypeApi> {
    pub mission_id: ManagedBuffer<M>,
    pub client: ManagedAddress<M>,
    pub talent: ManagedAddress<M>,
    pub content_hash: ManagedBuffer<M>,
    pub due_date: ManagedBuffer<M>,
    pub deposit: BigUint<M>,
    pub percentage_admin: u64,
    pub escrow: ManagedAddress<M>,
    pub step: ProvisioningStep,
    pub requested_on: u64,
    pub updated_on: u64,
}

impl<M: ManagedTypeApi> ProvisioningIntent<M> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mission_id: ManagedBuffer<M>,
        client: ManagedAddress<M>,
        talent: ManagedAddress<M>,
        content_hash: ManagedBuffer<M>,
        due_date: ManagedBuffer<M>,
        deposit: BigUint<M>,
        percentage_admin: u64,
        now: u64,
    ) -> Self {
        ProvisioningIntent {
            mission_id,
            client,
            talent,
            content_hash,
            due_date,
            deposit,
            percentage_admin,
            escrow: ManagedAddress::zero(),
            step: ProvisioningStep::Requested,
            requested_on: now,
            updated_on: now,
        }
    }

    pub fn mark_deployed(&mut self, escrow: ManagedAddress<M>, now: u64) -> Result<(), MissionError> {
        if escrow.is_zero() {
            return Err(MissionError::InvalidArgument);
        }
        self.advance(ProvisioningStep::Deployed, now)?;
        self.escrow = escrow;
        Ok(())
    }

    pub fn mark_initializing(&mut self, now: u64) -> Result<(), MissionError> {
        self.advance(ProvisioningStep::Initializing, now)
    }

    /// Closes the saga successfully and yields the directory entry to append.
    pub fn confirm(&mut self, now: u64) -> Result<DirectoryEntry<M>, MissionError> {
        self.advance(ProvisioningStep::Confirmed, now)?;
        Ok(DirectoryEntry {
            mission_id: self.mission_id.clone(),
            client: self.client.clone(),
            talent: self.talent.clone(),
            escrow: self.escrow.clone(),
            created_on: now,
        })
    }

    /// Closes the saga as failed and yields the amount owed back to the client.
    pub fn compensate(&mut self, now: u64) -> Result<BigUint<M>, MissionError> {
        self.advance(ProvisioningStep::Compensated, now)?;
        Ok(self.deposit.clone())
    }

    fn advance(&mut self, next: ProvisioningStep, now: u64) -> Result<(), MissionError> {
        if !self.step.can_advance_to(next) {
            return Err(MissionError::InvalidState);
        }
        self.step = next;
        self.updated_on = now;
        Ok(())
    }
}

/// Mission ids are 1..=64 bytes of `[a-z0-9_-]`.
pub fn validate_mission_id<M: ManagedTypeApi>(mission_id: &ManagedBuffer<M>) -> Result<(), MissionError> {
    let len = mission_id.len();
    if len == 0 || len > MAX_MISSION_ID_LEN {
        return Err(MissionError::InvalidArgument);
    }

    let mut buffer = [0u8; MAX_MISSION_ID_LEN];
    let bytes = mission_id.load_to_byte_array(&mut buffer);
    let valid = bytes[..len]
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'_' || *b == b'-');
    if !valid {
        return Err(MissionError::InvalidArgument);
    }
    Ok(())
}
