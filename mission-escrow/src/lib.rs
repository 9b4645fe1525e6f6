#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use shared_types::{CallContext, EscrowInfo, Mission, MissionAction, MissionError, Settlement};

/// Holds the deposit of a single mission and releases it as the client and
/// talent drive the mission through its lifecycle.
#[multiversx_sc::contract]
pub trait MissionEscrow {
    /// The deployer becomes the only account allowed to call `initialize`.
    /// Without an explicit admin, the deployer also receives the commission.
    #[init]
    fn init(&self, admin: OptionalValue<ManagedAddress>) {
        let deployer = self.blockchain().get_caller();
        let admin = match admin {
            OptionalValue::Some(addr) => addr,
            OptionalValue::None => deployer.clone(),
        };
        require!(!admin.is_zero(), (MissionError::InvalidArgument.as_str()));

        self.registry().set(&deployer);
        self.admin().set(&admin);
        self.closed().set(false);
    }

    #[upgrade]
    fn upgrade(&self) {}

    #[endpoint(initialize)]
    #[payable("EGLD")]
    fn initialize(
        &self,
        client: ManagedAddress,
        talent: ManagedAddress,
        content_hash: ManagedBuffer,
        due_date: ManagedBuffer,
        percentage_admin: u64,
    ) {
        require!(self.mission().is_empty(), (MissionError::AlreadyInitialized.as_str()));
        let ctx = self.call_context();
        require!(ctx.caller == self.registry().get(), (MissionError::Unauthorized.as_str()));

        let mission = match Mission::new(client, talent, content_hash, due_date, percentage_admin, &ctx) {
            Ok(mission) => mission,
            Err(err) => sc_panic!(err.as_str()),
        };
        self.mission().set(&mission);

        self.mission_initialized_event(
            &mission.client,
            &mission.talent,
            &mission.deposit,
            mission.percentage_admin,
            mission.created_on,
        );
    }

    #[endpoint(acceptMission)]
    fn accept_mission(&self) {
        let (mission, _) = self.run_action(MissionAction::Accept);
        self.mission_accepted_event(&mission.talent, mission.accepted_on);
    }

    #[endpoint(startMission)]
    fn start_mission(&self) {
        let (mission, _) = self.run_action(MissionAction::Start);
        self.mission_started_event(&mission.client, mission.active_since);
    }

    #[endpoint(completeMission)]
    fn complete_mission(&self) {
        let (mission, _) = self.run_action(MissionAction::Complete);
        self.mission_completed_event(&mission.talent, mission.completed_on);
    }

    /// Either party may walk away before completion; the client gets the
    /// whole balance back.
    #[endpoint(cancelMission)]
    fn cancel_mission(&self) {
        let caller = self.blockchain().get_caller();
        let (mission, settlement) = self.run_action(MissionAction::Cancel);
        self.mission_cancelled_event(
            &caller,
            &mission.client,
            &settlement.to_client,
            mission.cancelled_on,
        );
    }

    #[endpoint(payMission)]
    fn pay_mission(&self) {
        let (mission, settlement) = self.run_action(MissionAction::Pay);
        self.mission_paid_event(
            &mission.talent,
            &settlement.to_talent,
            &settlement.to_admin,
            &settlement.to_client,
            mission.paid_on,
        );
    }

    /// Contracts cannot remove themselves, so teardown sweeps the residual
    /// balance to the admin and closes the instance for good.
    #[endpoint(deleteContract)]
    fn delete_contract(&self) {
        let (_, settlement) = self.run_action(MissionAction::Delete);
        self.closed().set(true);

        self.contract_deleted_event(
            &self.admin().get(),
            &settlement.to_admin,
            self.blockchain().get_block_timestamp(),
        );
    }

    #[view(getMission)]
    fn get_mission(&self) -> OptionalValue<Mission<Self::Api>> {
        if self.mission().is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.mission().get())
        }
    }

    #[view(getStatus)]
    fn get_status(&self) -> OptionalValue<u8> {
        if self.mission().is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(self.mission().get().status.code())
        }
    }

    #[view(getAdmin)]
    fn get_admin(&self) -> ManagedAddress {
        self.admin().get()
    }

    #[view(getRegistry)]
    fn get_registry(&self) -> ManagedAddress {
        self.registry().get()
    }

    #[view(isClosed)]
    fn is_closed(&self) -> bool {
        self.closed().get()
    }

    #[view(getEscrowInfo)]
    fn get_escrow_info(&self) -> EscrowInfo<Self::Api> {
        EscrowInfo {
            registry: self.registry().get(),
            admin: self.admin().get(),
            initialized: !self.mission().is_empty(),
            closed: self.closed().get(),
            balance: self.current_balance(),
        }
    }

    fn run_action(&self, action: MissionAction) -> (Mission<Self::Api>, Settlement<Self::Api>) {
        require!(!self.closed().get(), (MissionError::Closed.as_str()));
        let mut mission = self.require_mission();
        let ctx = self.call_context();
        let admin = self.admin().get();

        let settlement = match mission.apply(action, &ctx, &admin) {
            Ok(settlement) => settlement,
            Err(err) => sc_panic!(err.as_str()),
        };

        self.mission().set(&mission);
        self.pay_out(&mission, &admin, &settlement);
        (mission, settlement)
    }

    fn pay_out(
        &self,
        mission: &Mission<Self::Api>,
        admin: &ManagedAddress,
        settlement: &Settlement<Self::Api>,
    ) {
        self.transfer_if_positive(&mission.talent, &settlement.to_talent);
        self.transfer_if_positive(admin, &settlement.to_admin);
        self.transfer_if_positive(&mission.client, &settlement.to_client);
    }

    fn transfer_if_positive(&self, to: &ManagedAddress, amount: &BigUint) {
        if *amount > 0u64 {
            self.send().direct_egld(to, amount);
        }
    }

    fn require_mission(&self) -> Mission<Self::Api> {
        require!(!self.mission().is_empty(), (MissionError::NotInitialized.as_str()));
        self.mission().get()
    }

    fn call_context(&self) -> CallContext<Self::Api> {
        CallContext {
            caller: self.blockchain().get_caller(),
            payment: self.call_value().egld_value().clone_value(),
            balance: self.current_balance(),
            now: self.blockchain().get_block_timestamp(),
        }
    }

    fn current_balance(&self) -> BigUint {
        let sc_address = self.blockchain().get_sc_address();
        self.blockchain().get_balance(&sc_address)
    }

    #[event("missionInitialized")]
    fn mission_initialized_event(
        &self,
        #[indexed] client: &ManagedAddress,
        #[indexed] talent: &ManagedAddress,
        #[indexed] deposit: &BigUint,
        #[indexed] percentage_admin: u64,
        created_on: u64,
    );

    #[event("missionAccepted")]
    fn mission_accepted_event(&self, #[indexed] talent: &ManagedAddress, accepted_on: u64);

    #[event("missionStarted")]
    fn mission_started_event(&self, #[indexed] client: &ManagedAddress, active_since: u64);

    #[event("missionCompleted")]
    fn mission_completed_event(&self, #[indexed] talent: &ManagedAddress, completed_on: u64);

    #[event("missionCancelled")]
    fn mission_cancelled_event(
        &self,
        #[indexed] cancelled_by: &ManagedAddress,
        #[indexed] client: &ManagedAddress,
        #[indexed] refund: &BigUint,
        cancelled_on: u64,
    );

    #[event("missionPaid")]
    fn mission_paid_event(
        &self,
        #[indexed] talent: &ManagedAddress,
        #[indexed] to_talent: &BigUint,
        #[indexed] to_admin: &BigUint,
        #[indexed] client_refund: &BigUint,
        paid_on: u64,
    );

    #[event("contractDeleted")]
    fn contract_deleted_event(
        &self,
        #[indexed] admin: &ManagedAddress,
        #[indexed] residual: &BigUint,
        deleted_on: u64,
    );

    #[storage_mapper("mission")]
    fn mission(&self) -> SingleValueMapper<Mission<Self::Api>>;

    #[storage_mapper("admin")]
    fn admin(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("registry")]
    fn registry(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("closed")]
    fn closed(&self) -> SingleValueMapper<bool>;
}
