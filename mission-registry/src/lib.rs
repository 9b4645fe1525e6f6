#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

pub mod mission_escrow_proxy;

use mission_escrow_proxy::MissionEscrowProxy;
use shared_types::{
    validate_mission_id, validate_terms, DirectoryEntry, MissionError, ProvisioningIntent,
    RegistryConfig, MAX_PAGE_SIZE, PERCENT_DENOMINATOR,
};

const DEPLOY_GAS: u64 = 20_000_000;

/// Factory for mission escrows. Each `createMission` deploys a fresh escrow,
/// funds it asynchronously and records it in an append-only directory once
/// the escrow confirms.
#[multiversx_sc::contract]
pub trait MissionRegistry {
    #[init]
    fn init(
        &self,
        escrow_template: ManagedAddress,
        admin: ManagedAddress,
        percentage_admin: u64,
        min_deposit: BigUint,
    ) {
        require!(!escrow_template.is_zero(), (MissionError::InvalidArgument.as_str()));
        require!(!admin.is_zero(), (MissionError::InvalidArgument.as_str()));
        require!(
            percentage_admin < PERCENT_DENOMINATOR,
            (MissionError::InvalidPercentage.as_str())
        );

        let caller = self.blockchain().get_caller();
        self.owner().set(&caller);
        self.paused().set(false);
        self.escrow_template().set(&escrow_template);
        self.admin().set(&admin);
        self.percentage_admin().set(percentage_admin);
        self.min_deposit().set(&min_deposit);
    }

    #[upgrade]
    fn upgrade(&self) {}

    /// Returns once the escrow is deployed and its funding call dispatched.
    /// The directory entry only appears when `mission_provisioned` runs.
    #[endpoint(createMission)]
    #[payable("EGLD")]
    fn create_mission(
        &self,
        mission_id: ManagedBuffer,
        talent: ManagedAddress,
        content_hash: ManagedBuffer,
        due_date: ManagedBuffer,
    ) {
        self.require_not_paused();
        if let Err(err) = validate_mission_id(&mission_id) {
            sc_panic!(err.as_str());
        }
        require!(
            !self.is_mission_id_taken(&mission_id),
            (MissionError::DuplicateMissionId.as_str())
        );

        let client = self.blockchain().get_caller();
        let deposit = self.call_value().egld_value().clone_value();
        let percentage_admin = self.percentage_admin().get();
        require!(deposit >= self.min_deposit().get(), (MissionError::InvalidAmount.as_str()));
        if let Err(err) = validate_terms(
            &client,
            &talent,
            &content_hash,
            &due_date,
            &deposit,
            percentage_admin,
        ) {
            sc_panic!(err.as_str());
        }

        let now = self.blockchain().get_block_timestamp();
        let mut intent = ProvisioningIntent::new(
            mission_id.clone(),
            client,
            talent,
            content_hash,
            due_date,
            deposit,
            percentage_admin,
            now,
        );
        self.provisioning(&mission_id).set(&intent);
        self.provisioning_requested_event(&mission_id, &intent.client, &intent.deposit, now);

        let escrow = self.deploy_escrow();
        if let Err(err) = intent.mark_deployed(escrow.clone(), now) {
            sc_panic!(err.as_str());
        }
        self.provisioning(&mission_id).set(&intent);
        self.escrow_deployed_event(&mission_id, &escrow, now);

        if let Err(err) = intent.mark_initializing(now) {
            sc_panic!(err.as_str());
        }
        self.provisioning(&mission_id).set(&intent);

        self.tx()
            .to(&escrow)
            .typed(MissionEscrowProxy)
            .initialize(
                &intent.client,
                &intent.talent,
                &intent.content_hash,
                &intent.due_date,
                intent.percentage_admin,
            )
            .egld(&intent.deposit)
            .callback(self.callbacks().mission_provisioned(mission_id))
            .async_call_and_exit();
    }

    /// Last step of provisioning. Must not fail: a reverted callback would
    /// leave the deposit stuck in the registry. Anything it cannot resolve is
    /// reported through `provisioningUnresolved` instead.
    #[callback]
    fn mission_provisioned(
        &self,
        mission_id: ManagedBuffer,
        #[call_result] result: ManagedAsyncCallResult<()>,
    ) {
        let escrow_call_ok = matches!(result, ManagedAsyncCallResult::Ok(()));
        let intent_mapper = self.provisioning(&mission_id);
        if intent_mapper.is_empty() {
            self.provisioning_unresolved_event(
                &mission_id,
                escrow_call_ok,
                &ManagedBuffer::from(MissionError::NotInitialized.as_str()),
            );
            return;
        }

        let mut intent = intent_mapper.get();
        let now = self.blockchain().get_block_timestamp();
        match result {
            ManagedAsyncCallResult::Ok(()) => {
                let entry = match intent.confirm(now) {
                    Ok(entry) => entry,
                    Err(err) => {
                        self.provisioning_unresolved_event(
                            &mission_id,
                            escrow_call_ok,
                            &ManagedBuffer::from(err.as_str()),
                        );
                        return;
                    },
                };
                let position = self.directory().push(&entry);
                self.directory_index(&mission_id).set(position);
                intent_mapper.set(&intent);

                self.mission_provisioned_event(
                    &mission_id,
                    &entry.client,
                    &entry.talent,
                    &entry.escrow,
                    now,
                );
            },
            ManagedAsyncCallResult::Err(err) => {
                let refund = match intent.compensate(now) {
                    Ok(refund) => refund,
                    Err(mission_err) => {
                        self.provisioning_unresolved_event(
                            &mission_id,
                            escrow_call_ok,
                            &ManagedBuffer::from(mission_err.as_str()),
                        );
                        return;
                    },
                };
                intent_mapper.set(&intent);
                if refund > 0u64 {
                    self.send().direct_egld(&intent.client, &refund);
                }

                self.provisioning_failed_event(
                    &mission_id,
                    &intent.client,
                    &refund,
                    err.err_code,
                    &err.err_msg,
                );
            },
        }
    }

    #[endpoint(setEscrowTemplate)]
    fn set_escrow_template(&self, template: ManagedAddress) {
        self.require_owner();
        require!(!template.is_zero(), (MissionError::InvalidArgument.as_str()));
        self.escrow_template().set(template);
    }

    #[endpoint(setAdmin)]
    fn set_admin(&self, admin: ManagedAddress) {
        self.require_owner();
        require!(!admin.is_zero(), (MissionError::InvalidArgument.as_str()));
        self.admin().set(admin);
    }

    /// Applies to missions created afterwards; existing escrows keep their split.
    #[endpoint(setPercentageAdmin)]
    fn set_percentage_admin(&self, value: u64) {
        self.require_owner();
        require!(value < PERCENT_DENOMINATOR, (MissionError::InvalidPercentage.as_str()));
        self.percentage_admin().set(value);
    }

    #[endpoint(setMinDeposit)]
    fn set_min_deposit(&self, value: BigUint) {
        self.require_owner();
        self.min_deposit().set(value);
    }

    #[endpoint(setPaused)]
    fn set_paused(&self, paused: bool) {
        self.require_owner();
        self.paused().set(paused);
    }

    #[endpoint(setOwner)]
    fn set_owner(&self, new_owner: ManagedAddress) {
        self.require_owner();
        require!(!new_owner.is_zero(), (MissionError::InvalidArgument.as_str()));
        self.owner().set(new_owner);
    }

    /// All directory entries, or only those where `account` is client or talent.
    #[view(getMissions)]
    fn get_missions(
        &self,
        account: OptionalValue<ManagedAddress>,
    ) -> MultiValueEncoded<DirectoryEntry<Self::Api>> {
        let account = account.into_option();
        let mut out = MultiValueEncoded::new();
        for entry in self.directory().iter() {
            let matches = match &account {
                Some(addr) => entry.involves(addr),
                None => true,
            };
            if matches {
                out.push(entry);
            }
        }
        out
    }

    #[view(getMissionsPage)]
    fn get_missions_page(&self, from: u64, size: u64) -> MultiValueEncoded<DirectoryEntry<Self::Api>> {
        let mut out = MultiValueEncoded::new();
        let total = self.directory().len() as u64;
        let effective_size = core::cmp::min(size, MAX_PAGE_SIZE);
        if from >= total || effective_size == 0 {
            return out;
        }

        let mut idx = from + 1;
        let mut emitted = 0;
        while idx <= total && emitted < effective_size {
            out.push(self.directory().get(idx as usize));
            idx += 1;
            emitted += 1;
        }
        out
    }

    #[view(getMissionEntry)]
    fn get_mission_entry(&self, mission_id: ManagedBuffer) -> OptionalValue<DirectoryEntry<Self::Api>> {
        if self.directory_index(&mission_id).is_empty() {
            OptionalValue::None
        } else {
            let position = self.directory_index(&mission_id).get();
            OptionalValue::Some(self.directory().get(position))
        }
    }

    #[view(getProvisioning)]
    fn get_provisioning(&self, mission_id: ManagedBuffer) -> OptionalValue<ProvisioningIntent<Self::Api>> {
        if self.provisioning(&mission_id).is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.provisioning(&mission_id).get())
        }
    }

    #[view(isMissionIdAvailable)]
    fn is_mission_id_available(&self, mission_id: ManagedBuffer) -> bool {
        validate_mission_id(&mission_id).is_ok() && !self.is_mission_id_taken(&mission_id)
    }

    #[view(getMissionCount)]
    fn get_mission_count(&self) -> u64 {
        self.directory().len() as u64
    }

    #[view(getConfig)]
    fn get_config(&self) -> RegistryConfig<Self::Api> {
        RegistryConfig {
            owner: self.owner().get(),
            admin: self.admin().get(),
            escrow_template: self.escrow_template().get(),
            percentage_admin: self.percentage_admin().get(),
            min_deposit: self.min_deposit().get(),
            paused: self.paused().get(),
        }
    }

    fn deploy_escrow(&self) -> ManagedAddress {
        let admin = self.admin().get();
        self.tx()
            .typed(MissionEscrowProxy)
            .init(OptionalValue::Some(admin))
            .from_source(self.escrow_template().get())
            .gas(DEPLOY_GAS)
            .returns(ReturnsNewManagedAddress)
            .sync_call()
    }

    /// Ids stay taken while provisioning is in flight and after it succeeds.
    fn is_mission_id_taken(&self, mission_id: &ManagedBuffer) -> bool {
        if !self.directory_index(mission_id).is_empty() {
            return true;
        }
        let intent = self.provisioning(mission_id);
        !intent.is_empty() && intent.get().step.reserves_id()
    }

    fn require_owner(&self) {
        require!(
            self.blockchain().get_caller() == self.owner().get(),
            (MissionError::Unauthorized.as_str())
        );
    }

    fn require_not_paused(&self) {
        require!(!self.paused().get(), (MissionError::Paused.as_str()));
    }

    #[event("provisioningRequested")]
    fn provisioning_requested_event(
        &self,
        #[indexed] mission_id: &ManagedBuffer,
        #[indexed] client: &ManagedAddress,
        #[indexed] deposit: &BigUint,
        requested_on: u64,
    );

    #[event("escrowDeployed")]
    fn escrow_deployed_event(
        &self,
        #[indexed] mission_id: &ManagedBuffer,
        #[indexed] escrow: &ManagedAddress,
        deployed_on: u64,
    );

    #[event("missionProvisioned")]
    fn mission_provisioned_event(
        &self,
        #[indexed] mission_id: &ManagedBuffer,
        #[indexed] client: &ManagedAddress,
        #[indexed] talent: &ManagedAddress,
        #[indexed] escrow: &ManagedAddress,
        confirmed_on: u64,
    );

    #[event("provisioningFailed")]
    fn provisioning_failed_event(
        &self,
        #[indexed] mission_id: &ManagedBuffer,
        #[indexed] client: &ManagedAddress,
        #[indexed] refund: &BigUint,
        #[indexed] err_code: u32,
        err_msg: &ManagedBuffer,
    );

    #[event("provisioningUnresolved")]
    fn provisioning_unresolved_event(
        &self,
        #[indexed] mission_id: &ManagedBuffer,
        #[indexed] escrow_call_ok: bool,
        error: &ManagedBuffer,
    );

    #[storage_mapper("owner")]
    fn owner(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("paused")]
    fn paused(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("admin")]
    fn admin(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("escrowTemplate")]
    fn escrow_template(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("percentageAdmin")]
    fn percentage_admin(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("minDeposit")]
    fn min_deposit(&self) -> SingleValueMapper<BigUint>;

    #[storage_mapper("directory")]
    fn directory(&self) -> VecMapper<DirectoryEntry<Self::Api>>;

    #[storage_mapper("directoryIndex")]
    fn directory_index(&self, mission_id: &ManagedBuffer) -> SingleValueMapper<usize>;

    #[storage_mapper("provisioning")]
    fn provisioning(
        &self,
        mission_id: &ManagedBuffer,
    ) -> SingleValueMapper<ProvisioningIntent<Self::Api>>;
}
