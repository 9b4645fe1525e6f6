#![no_std]

multiversx_sc::imports!();
multiversx_sc::derive_imports!();

pub mod errors;
pub mod mission;
pub mod provisioning;

pub use errors::*;
pub use mission::{
    split_deposit, validate_terms, ActionRule, CallContext, FundSplit, Mission, MissionAction,
    MissionStatus, Role, Settlement,
};
pub use provisioning::{validate_mission_id, DirectoryEntry, ProvisioningIntent, ProvisioningStep};

pub const PERCENT_DENOMINATOR: u64 = 100;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_MISSION_ID_LEN: usize = 64;
pub const MAX_CONTENT_HASH_LEN: usize = 128;
pub const MAX_DUE_DATE_LEN: usize = 64;

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct RegistryConfig<M: ManagedTypeApi> {
    pub owner: ManagedAddress<M>,
    pub admin: ManagedAddress<M>,
    pub escrow_template: ManagedAddress<M>,
    pub percentage_admin: u64,
    pub min_deposit: BigUint<M>,
    pub paused: bool,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone)]
pub struct EscrowInfo<M: ManagedTypeApi> {
    pub registry: ManagedAddress<M>,
    pub admin: ManagedAddress<M>,
    pub initialized: bool,
    pub closed: bool,
    pub balance: BigUint<M>,
}
