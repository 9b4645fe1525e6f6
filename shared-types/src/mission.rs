multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::errors::MissionError;
use crate::{MAX_CONTENT_HASH_LEN, MAX_DUE_DATE_LEN, PERCENT_DENOMINATOR};

/// Lifecycle of a mission. Codes 2, 7 and 8 are reserved for the rejection
/// and dispute states, which this escrow does not implement.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Eq, Debug)]
pub enum MissionStatus {
    WaitingTalentAcceptance = 0,
    Accepted = 1,
    Active = 3,
    Cancelled = 4,
    Completed = 5,
    Paid = 6,
}

impl MissionStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Client,
    Talent,
    ClientOrTalent,
    Admin,
}

impl Role {
    pub fn admits<M: ManagedTypeApi>(
        self,
        caller: &ManagedAddress<M>,
        mission: &Mission<M>,
        admin: &ManagedAddress<M>,
    ) -> bool {
        match self {
            Role::Client => caller == &mission.client,
            Role::Talent => caller == &mission.talent,
            Role::ClientOrTalent => caller == &mission.client || caller == &mission.talent,
            Role::Admin => caller == admin,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MissionAction {
    Accept,
    Start,
    Complete,
    Cancel,
    Pay,
    Delete,
}

/// Guard declared for one action: who may call it, from which states, and
/// the state it leaves the mission in (`None` keeps the status).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ActionRule {
    pub role: Role,
    pub from: &'static [MissionStatus],
    pub to: Option<MissionStatus>,
}

const CANCELLABLE: &[MissionStatus] = &[
    MissionStatus::WaitingTalentAcceptance,
    MissionStatus::Accepted,
    MissionStatus::Active,
];
const SETTLED: &[MissionStatus] = &[MissionStatus::Paid, MissionStatus::Cancelled];

impl MissionAction {
    pub const fn rule(self) -> ActionRule {
        match self {
            MissionAction::Accept => ActionRule {
                role: Role::Talent,
                from: &[MissionStatus::WaitingTalentAcceptance],
                to: Some(MissionStatus::Accepted),
            },
            MissionAction::Start => ActionRule {
                role: Role::Client,
                from: &[MissionStatus::Accepted],
                to: Some(MissionStatus::Active),
            },
            MissionAction::Complete => ActionRule {
                role: Role::Talent,
                from: &[MissionStatus::Active],
                to: Some(MissionStatus::Completed),
            },
            MissionAction::Cancel => ActionRule {
                role: Role::ClientOrTalent,
                from: CANCELLABLE,
                to: Some(MissionStatus::Cancelled),
            },
            MissionAction::Pay => ActionRule {
                role: Role::Client,
                from: &[MissionStatus::Completed],
                to: Some(MissionStatus::Paid),
            },
            MissionAction::Delete => ActionRule {
                role: Role::Admin,
                from: SETTLED,
                to: None,
            },
        }
    }
}

/// Host facts for one call.
pub struct CallContext<M: ManagedTypeApi> {
    pub caller: ManagedAddress<M>,
    pub payment: BigUint<M>,
    pub balance: BigUint<M>,
    pub now: u64,
}

pub struct FundSplit<M: ManagedTypeApi> {
    pub to_admin: BigUint<M>,
    pub to_talent: BigUint<M>,
}

/// Transfers the escrow owes once an action has been applied.
pub struct Settlement<M: ManagedTypeApi> {
    pub to_talent: BigUint<M>,
    pub to_admin: BigUint<M>,
    pub to_client: BigUint<M>,
}

impl<M: ManagedTypeApi> Settlement<M> {
    pub fn nothing() -> Self {
        Settlement {
            to_talent: BigUint::zero(),
            to_admin: BigUint::zero(),
            to_client: BigUint::zero(),
        }
    }
}

/// Admin commission is `floor(deposit * percentage / 100)`, multiplied before
/// dividing so small deposits still pay a commission; the talent gets the rest.
pub fn split_deposit<M: ManagedTypeApi>(
    deposit: &BigUint<M>,
    percentage_admin: u64,
) -> Result<FundSplit<M>, MissionError> {
    if percentage_admin >= PERCENT_DENOMINATOR {
        return Err(MissionError::InvalidPercentage);
    }
    if *deposit == 0u64 {
        return Err(MissionError::InvalidAmount);
    }

    let to_admin = deposit * percentage_admin / PERCENT_DENOMINATOR;
    let to_talent = deposit - &to_admin;
    Ok(FundSplit { to_admin, to_talent })
}

pub fn validate_terms<M: ManagedTypeApi>(
    client: &ManagedAddress<M>,
    talent: &ManagedAddress<M>,
    content_hash: &ManagedBuffer<M>,
    due_date: &ManagedBuffer<M>,
    deposit: &BigUint<M>,
    percentage_admin: u64,
) -> Result<FundSplit<M>, MissionError> {
    if client.is_zero() || talent.is_zero() {
        return Err(MissionError::InvalidArgument);
    }
    if content_hash.len() > MAX_CONTENT_HASH_LEN || due_date.len() > MAX_DUE_DATE_LEN {
        return Err(MissionError::InvalidArgument);
    }
    split_deposit(deposit, percentage_admin)
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct Mission<M: ManagedTypeApi> {
    pub client: ManagedAddress<M>,
    pub talent: ManagedAddress<M>,
    pub content_hash: ManagedBuffer<M>,
    pub deposit: BigUint<M>,
    pub due_date: ManagedBuffer<M>,
    pub percentage_admin: u64,
    pub amount_to_pay_talent: BigUint<M>,
    pub amount_to_pay_admin: BigUint<M>,
    pub status: MissionStatus,
    pub created_on: u64,
    pub accepted_on: u64,
    pub active_since: u64,
    pub cancelled_on: u64,
    pub completed_on: u64,
    pub paid_on: u64,
}

impl<M: ManagedTypeApi> Mission<M> {
    /// Opens a mission funded by the payment attached to `ctx`.
    pub fn new(
        client: ManagedAddress<M>,
        talent: ManagedAddress<M>,
        content_hash: ManagedBuffer<M>,
        due_date: ManagedBuffer<M>,
        percentage_admin: u64,
        ctx: &CallContext<M>,
    ) -> Result<Self, MissionError> {
        let split = validate_terms(
            &client,
            &talent,
            &content_hash,
            &due_date,
            &ctx.payment,
            percentage_admin,
        )?;

        Ok(Mission {
            client,
            talent,
            content_hash,
            deposit: ctx.payment.clone(),
            due_date,
            percentage_admin,
            amount_to_pay_talent: split.to_talent,
            amount_to_pay_admin: split.to_admin,
            status: MissionStatus::WaitingTalentAcceptance,
            created_on: ctx.now,
            accepted_on: 0,
            active_since: 0,
            cancelled_on: 0,
            completed_on: 0,
            paid_on: 0,
        })
    }

    pub fn authorize(
        &self,
        action: MissionAction,
        caller: &ManagedAddress<M>,
        admin: &ManagedAddress<M>,
    ) -> Result<ActionRule, MissionError> {
        let rule = action.rule();
        if !rule.role.admits(caller, self, admin) {
            return Err(MissionError::Unauthorized);
        }
        if !rule.from.contains(&self.status) {
            return Err(MissionError::InvalidState);
        }
        Ok(rule)
    }

    /// Checks the action's guard and funds, then moves the mission to its next
    /// state. Nothing is modified when an error is returned.
    pub fn apply(
        &mut self,
        action: MissionAction,
        ctx: &CallContext<M>,
        admin: &ManagedAddress<M>,
    ) -> Result<Settlement<M>, MissionError> {
        let rule = self.authorize(action, &ctx.caller, admin)?;
        let settlement = self.settlement_for(action, &ctx.balance)?;

        if let Some(next) = rule.to {
            self.status = next;
            self.stamp(next, ctx.now);
        }
        Ok(settlement)
    }

    fn settlement_for(
        &self,
        action: MissionAction,
        balance: &BigUint<M>,
    ) -> Result<Settlement<M>, MissionError> {
        let mut settlement = Settlement::nothing();
        match action {
            MissionAction::Cancel => {
                settlement.to_client = balance.clone();
            },
            MissionAction::Pay => {
                if balance < &self.deposit {
                    return Err(MissionError::InsufficientFunds);
                }
                settlement.to_talent = self.amount_to_pay_talent.clone();
                settlement.to_admin = self.amount_to_pay_admin.clone();
                settlement.to_client = balance - &self.deposit;
            },
            MissionAction::Delete => {
                settlement.to_admin = balance.clone();
            },
            MissionAction::Accept | MissionAction::Start | MissionAction::Complete => {},
        }
        Ok(settlement)
    }

    fn stamp(&mut self, status: MissionStatus, now: u64) {
        match status {
            MissionStatus::Accepted => self.accepted_on = now,
            MissionStatus::Active => self.active_since = now,
            MissionStatus::Completed => self.completed_on = now,
            MissionStatus::Cancelled => self.cancelled_on = now,
            MissionStatus::Paid => self.paid_on = now,
            MissionStatus::WaitingTalentAcceptance => {},
        }
    }
}
