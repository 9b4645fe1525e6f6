#![no_std]

multiversx_sc::imports!();

/// Escrow stand-in whose `initialize` always fails, so the registry has to
/// take its refund path.
#[multiversx_sc::contract]
pub trait RejectingEscrowMock {
    #[init]
    fn init(&self, admin: OptionalValue<ManagedAddress>) {
        let admin = match admin {
            OptionalValue::Some(addr) => addr,
            OptionalValue::None => self.blockchain().get_caller(),
        };
        self.admin().set(admin);
    }

    #[upgrade]
    fn upgrade(&self) {}

    #[endpoint(initialize)]
    #[payable("EGLD")]
    fn initialize(
        &self,
        _client: ManagedAddress,
        _talent: ManagedAddress,
        _content_hash: ManagedBuffer,
        _due_date: ManagedBuffer,
        _percentage_admin: u64,
    ) {
        sc_panic!("ERR_MOCK_REJECTED");
    }

    #[view(getAdmin)]
    #[storage_mapper("admin")]
    fn admin(&self) -> SingleValueMapper<ManagedAddress>;
}
