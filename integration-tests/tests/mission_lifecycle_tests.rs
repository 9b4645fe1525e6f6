use multiversx_sc::types::{BigUint, ManagedAddress, ManagedBuffer};
use multiversx_sc_scenario::api::{DebugApi, StaticApi};
use shared_types::{
    split_deposit, CallContext, Mission, MissionAction, MissionError, MissionStatus,
    Role, Settlement, MAX_CONTENT_HASH_LEN,
};

type Api = StaticApi;

type MissionEscrowContract = mission_escrow::ContractObj<DebugApi>;
type MissionRegistryContract = mission_registry::ContractObj<DebugApi>;

const REGISTRY: u8 = 0x0a;
const ADMIN: u8 = 0x0b;
const CLIENT: u8 = 0x0c;
const TALENT: u8 = 0x0d;
const STRANGER: u8 = 0x0e;

const DEPOSIT: u64 = 500;
const PERCENTAGE_ADMIN: u64 = 10;

fn addr(byte: u8) -> ManagedAddress<Api> {
    ManagedAddress::from(&[byte; 32])
}

fn amount(value: &BigUint<Api>) -> u64 {
    value.to_u64().unwrap()
}

fn paid_out(settlement: &Settlement<Api>) -> u64 {
    amount(&settlement.to_talent) + amount(&settlement.to_admin) + amount(&settlement.to_client)
}

fn ctx(caller: u8, payment: u64, balance: u64, now: u64) -> CallContext<Api> {
    CallContext {
        caller: addr(caller),
        payment: BigUint::from(payment),
        balance: BigUint::from(balance),
        now,
    }
}

fn open_mission(deposit: u64, percentage_admin: u64) -> Mission<Api> {
    Mission::new(
        addr(CLIENT),
        addr(TALENT),
        ManagedBuffer::from("bafyterms"),
        ManagedBuffer::from("22/11/2022"),
        percentage_admin,
        &ctx(REGISTRY, deposit, deposit, 1_000),
    )
    .unwrap()
}

fn act(mission: &mut Mission<Api>, action: MissionAction, caller: u8, balance: u64, now: u64) -> Result<u64, MissionError> {
    mission
        .apply(action, &ctx(caller, 0, balance, now), &addr(ADMIN))
        .map(|settlement| paid_out(&settlement))
}

fn mission_in(status: MissionStatus) -> Mission<Api> {
    let mut mission = open_mission(DEPOSIT, PERCENTAGE_ADMIN);
    let path: &[(MissionAction, u8)] = match status {
        MissionStatus::WaitingTalentAcceptance => &[],
        MissionStatus::Accepted => &[(MissionAction::Accept, TALENT)],
        MissionStatus::Active => &[(MissionAction::Accept, TALENT), (MissionAction::Start, CLIENT)],
        MissionStatus::Completed => &[
            (MissionAction::Accept, TALENT),
            (MissionAction::Start, CLIENT),
            (MissionAction::Complete, TALENT),
        ],
        MissionStatus::Paid => &[
            (MissionAction::Accept, TALENT),
            (MissionAction::Start, CLIENT),
            (MissionAction::Complete, TALENT),
            (MissionAction::Pay, CLIENT),
        ],
        MissionStatus::Cancelled => &[(MissionAction::Cancel, CLIENT)],
    };
    for (step, (action, caller)) in path.iter().enumerate() {
        act(&mut mission, *action, *caller, DEPOSIT, 2_000 + step as u64).unwrap();
    }
    assert_eq!(mission.status, status);
    mission
}

fn snapshot(mission: &Mission<Api>) -> (MissionStatus, [u64; 6]) {
    (
        mission.status,
        [
            mission.created_on,
            mission.accepted_on,
            mission.active_since,
            mission.completed_on,
            mission.cancelled_on,
            mission.paid_on,
        ],
    )
}

#[test]
fn contract_objects_build() {
    let _: fn() -> MissionEscrowContract = mission_escrow::contract_obj;
    let _: fn() -> MissionRegistryContract = mission_registry::contract_obj;
}

#[test]
fn split_of_500_at_ten_percent() {
    let split = split_deposit(&BigUint::<Api>::from(500u64), 10).unwrap();
    assert_eq!(amount(&split.to_admin), 50);
    assert_eq!(amount(&split.to_talent), 450);
}

#[test]
fn split_always_adds_up_to_the_deposit() {
    let deposits = [1u64, 7, 99, 100, 101, 333, 500, 12_345, 1_000_000_007, u64::MAX];
    for deposit in deposits {
        for percentage in 0..100u64 {
            let split = split_deposit(&BigUint::<Api>::from(deposit), percentage).unwrap();
            let expected_admin = (deposit as u128 * percentage as u128 / 100) as u64;
            assert_eq!(amount(&split.to_admin), expected_admin);
            assert!(&split.to_admin + &split.to_talent == BigUint::<Api>::from(deposit));
        }
    }
}

#[test]
fn small_deposits_still_pay_commission() {
    let split = split_deposit(&BigUint::<Api>::from(50u64), 10).unwrap();
    assert_eq!(amount(&split.to_admin), 5);
    assert_eq!(amount(&split.to_talent), 45);

    let split = split_deposit(&BigUint::<Api>::from(9u64), 10).unwrap();
    assert_eq!(amount(&split.to_admin), 0);
    assert_eq!(amount(&split.to_talent), 9);
}

#[test]
fn split_rejects_bad_inputs() {
    let deposit = BigUint::<Api>::from(500u64);
    assert_eq!(split_deposit(&deposit, 100).err(), Some(MissionError::InvalidPercentage));
    assert_eq!(split_deposit(&deposit, 250).err(), Some(MissionError::InvalidPercentage));
    assert_eq!(
        split_deposit(&BigUint::<Api>::zero(), 10).err(),
        Some(MissionError::InvalidAmount)
    );
}

#[test]
fn new_mission_waits_for_talent() {
    let mission = open_mission(DEPOSIT, PERCENTAGE_ADMIN);
    assert_eq!(mission.status, MissionStatus::WaitingTalentAcceptance);
    assert_eq!(mission.status.code(), 0);
    assert_eq!(amount(&mission.deposit), 500);
    assert_eq!(amount(&mission.amount_to_pay_admin), 50);
    assert_eq!(amount(&mission.amount_to_pay_talent), 450);
    assert_eq!(mission.created_on, 1_000);
    assert_eq!(snapshot(&mission).1[1..], [0, 0, 0, 0, 0]);
}

#[test]
fn new_mission_validates_parties_and_terms() {
    let hash = ManagedBuffer::<Api>::from("bafyterms");
    let due = ManagedBuffer::<Api>::from("22/11/2022");
    let funded = ctx(REGISTRY, DEPOSIT, DEPOSIT, 1_000);

    let self_hired =
        Mission::new(addr(CLIENT), addr(CLIENT), hash.clone(), due.clone(), 10, &funded).unwrap();
    assert_eq!(self_hired.status, MissionStatus::WaitingTalentAcceptance);
    assert!(self_hired.client == self_hired.talent);

    let zero_talent = Mission::new(addr(CLIENT), ManagedAddress::zero(), hash.clone(), due.clone(), 10, &funded);
    assert_eq!(zero_talent.err(), Some(MissionError::InvalidArgument));

    let long_hash = ManagedBuffer::<Api>::from(&[b'h'; MAX_CONTENT_HASH_LEN + 1][..]);
    let oversized = Mission::new(addr(CLIENT), addr(TALENT), long_hash, due.clone(), 10, &funded);
    assert_eq!(oversized.err(), Some(MissionError::InvalidArgument));

    let unfunded = Mission::new(addr(CLIENT), addr(TALENT), hash.clone(), due.clone(), 10, &ctx(REGISTRY, 0, 0, 1_000));
    assert_eq!(unfunded.err(), Some(MissionError::InvalidAmount));

    let greedy = Mission::new(addr(CLIENT), addr(TALENT), hash, due, 100, &funded);
    assert_eq!(greedy.err(), Some(MissionError::InvalidPercentage));
}

#[test]
fn happy_path_pays_talent_admin_and_client() {
    let mut mission = open_mission(DEPOSIT, PERCENTAGE_ADMIN);

    act(&mut mission, MissionAction::Accept, TALENT, DEPOSIT, 2_000).unwrap();
    assert_eq!(mission.status.code(), 1);
    assert_eq!(mission.accepted_on, 2_000);

    act(&mut mission, MissionAction::Start, CLIENT, DEPOSIT, 3_000).unwrap();
    assert_eq!(mission.status.code(), 3);
    assert_eq!(mission.active_since, 3_000);

    act(&mut mission, MissionAction::Complete, TALENT, DEPOSIT, 4_000).unwrap();
    assert_eq!(mission.status.code(), 5);
    assert_eq!(mission.completed_on, 4_000);

    let settlement = mission
        .apply(MissionAction::Pay, &ctx(CLIENT, 0, 520, 5_000), &addr(ADMIN))
        .unwrap();
    assert_eq!(mission.status.code(), 6);
    assert_eq!(mission.paid_on, 5_000);
    assert_eq!(amount(&settlement.to_talent), 450);
    assert_eq!(amount(&settlement.to_admin), 50);
    assert_eq!(amount(&settlement.to_client), 20);
    assert_eq!(paid_out(&settlement), 520);
    assert_eq!(mission.cancelled_on, 0);
}

#[test]
fn wrong_caller_is_rejected_without_change() {
    let cases = [
        (MissionStatus::WaitingTalentAcceptance, MissionAction::Accept, CLIENT),
        (MissionStatus::Accepted, MissionAction::Start, TALENT),
        (MissionStatus::Active, MissionAction::Complete, CLIENT),
        (MissionStatus::Active, MissionAction::Cancel, ADMIN),
        (MissionStatus::Completed, MissionAction::Pay, TALENT),
        (MissionStatus::Paid, MissionAction::Delete, CLIENT),
    ];
    for (status, action, caller) in cases {
        for intruder in [caller, STRANGER] {
            let mut mission = mission_in(status);
            let before = snapshot(&mission);
            assert_eq!(
                act(&mut mission, action, intruder, DEPOSIT, 9_000),
                Err(MissionError::Unauthorized)
            );
            assert_eq!(snapshot(&mission), before);
        }
    }
}

#[test]
fn wrong_state_is_rejected_without_change() {
    let cases = [
        (MissionStatus::WaitingTalentAcceptance, MissionAction::Start, CLIENT),
        (MissionStatus::WaitingTalentAcceptance, MissionAction::Pay, CLIENT),
        (MissionStatus::Accepted, MissionAction::Accept, TALENT),
        (MissionStatus::Accepted, MissionAction::Complete, TALENT),
        (MissionStatus::Active, MissionAction::Pay, CLIENT),
        (MissionStatus::Completed, MissionAction::Complete, TALENT),
        (MissionStatus::Paid, MissionAction::Pay, CLIENT),
        (MissionStatus::Active, MissionAction::Delete, ADMIN),
        (MissionStatus::Cancelled, MissionAction::Accept, TALENT),
    ];
    for (status, action, caller) in cases {
        let mut mission = mission_in(status);
        let before = snapshot(&mission);
        assert_eq!(
            act(&mut mission, action, caller, DEPOSIT, 9_000),
            Err(MissionError::InvalidState)
        );
        assert_eq!(snapshot(&mission), before);
    }
}

#[test]
fn cancel_refunds_whole_balance_from_open_states() {
    let open = [
        MissionStatus::WaitingTalentAcceptance,
        MissionStatus::Accepted,
        MissionStatus::Active,
    ];
    for status in open {
        for canceller in [CLIENT, TALENT] {
            let mut mission = mission_in(status);
            let settlement = mission
                .apply(MissionAction::Cancel, &ctx(canceller, 0, 507, 7_000), &addr(ADMIN))
                .unwrap();
            assert_eq!(mission.status, MissionStatus::Cancelled);
            assert_eq!(mission.cancelled_on, 7_000);
            assert_eq!(amount(&settlement.to_client), 507);
            assert_eq!(amount(&settlement.to_talent), 0);
            assert_eq!(amount(&settlement.to_admin), 0);
        }
    }
}

#[test]
fn cancel_is_rejected_once_work_is_done() {
    for status in [MissionStatus::Completed, MissionStatus::Paid, MissionStatus::Cancelled] {
        let mut mission = mission_in(status);
        let before = snapshot(&mission);
        assert_eq!(
            act(&mut mission, MissionAction::Cancel, CLIENT, DEPOSIT, 9_000),
            Err(MissionError::InvalidState)
        );
        assert_eq!(snapshot(&mission), before);
    }
}

#[test]
fn payment_needs_the_full_deposit() {
    let mut mission = mission_in(MissionStatus::Completed);
    let before = snapshot(&mission);
    assert_eq!(
        act(&mut mission, MissionAction::Pay, CLIENT, DEPOSIT - 1, 9_000),
        Err(MissionError::InsufficientFunds)
    );
    assert_eq!(snapshot(&mission), before);

    assert_eq!(act(&mut mission, MissionAction::Pay, CLIENT, DEPOSIT, 9_500), Ok(DEPOSIT));
    assert_eq!(mission.status, MissionStatus::Paid);
}

#[test]
fn admin_sweeps_residual_balance_after_settlement() {
    for status in [MissionStatus::Paid, MissionStatus::Cancelled] {
        let mut mission = mission_in(status);
        let before = snapshot(&mission);
        let settlement = mission
            .apply(MissionAction::Delete, &ctx(ADMIN, 0, 3, 9_000), &addr(ADMIN))
            .unwrap();
        assert_eq!(amount(&settlement.to_admin), 3);
        assert_eq!(amount(&settlement.to_client), 0);
        assert_eq!(snapshot(&mission), before);
    }
}

#[test]
fn action_table_declares_roles_and_states() {
    let actions = [
        MissionAction::Accept,
        MissionAction::Start,
        MissionAction::Complete,
        MissionAction::Cancel,
        MissionAction::Pay,
        MissionAction::Delete,
    ];
    let settled = [MissionStatus::Paid, MissionStatus::Cancelled];
    for action in actions {
        let rule = action.rule();
        assert!(!rule.from.is_empty(), "{action:?} has no source state");
        for status in rule.from {
            assert!(!(settled.contains(status) && rule.to.is_some()), "{action:?} leaves {status:?}");
        }
    }

    let cancel = MissionAction::Cancel.rule();
    assert_eq!(cancel.role, Role::ClientOrTalent);
    assert_eq!(
        cancel.from,
        &[
            MissionStatus::WaitingTalentAcceptance,
            MissionStatus::Accepted,
            MissionStatus::Active
        ][..]
    );
    assert_eq!(MissionAction::Pay.rule().role, Role::Client);
    assert_eq!(MissionAction::Delete.rule().role, Role::Admin);
    assert_eq!(MissionAction::Delete.rule().to, None);
}

#[test]
fn status_codes_skip_reserved_values() {
    let codes = [
        (MissionStatus::WaitingTalentAcceptance, 0u8),
        (MissionStatus::Accepted, 1),
        (MissionStatus::Active, 3),
        (MissionStatus::Cancelled, 4),
        (MissionStatus::Completed, 5),
        (MissionStatus::Paid, 6),
    ];
    for (status, code) in codes {
        assert_eq!(status.code(), code);
    }
}

#[test]
fn errors_map_to_codes() {
    let codes = [
        (MissionError::Unauthorized, "ERR_UNAUTHORIZED"),
        (MissionError::InvalidState, "ERR_INVALID_STATE"),
        (MissionError::Closed, "ERR_CLOSED"),
        (MissionError::NotInitialized, "ERR_NOT_INITIALIZED"),
        (MissionError::InsufficientFunds, "ERR_INSUFFICIENT_FUNDS"),
        (MissionError::DuplicateMissionId, "ERR_DUPLICATE_MISSION_ID"),
        (MissionError::AlreadyInitialized, "ERR_ALREADY_INITIALIZED"),
        (MissionError::InvalidPercentage, "ERR_INVALID_PERCENTAGE"),
        (MissionError::InvalidAmount, "ERR_INVALID_AMOUNT"),
        (MissionError::InvalidArgument, "ERR_INVALID_ARGUMENT"),
        (MissionError::Paused, "ERR_PAUSED"),
    ];
    for (err, code) in codes {
        assert_eq!(err.as_str(), code);
    }
}
