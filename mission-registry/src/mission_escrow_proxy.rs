use multiversx_sc::proxy_imports::*;

pub struct MissionEscrowProxy;

impl<Env, From, To, Gas> TxProxyTrait<Env, From, To, Gas> for MissionEscrowProxy
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    type TxProxyMethods = MissionEscrowProxyMethods<Env, From, To, Gas>;

    fn proxy_methods(self, tx: Tx<Env, From, To, (), Gas, (), ()>) -> Self::TxProxyMethods {
        MissionEscrowProxyMethods { wrapped_tx: tx }
    }
}

pub struct MissionEscrowProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    wrapped_tx: Tx<Env, From, To, (), Gas, (), ()>,
}

impl<Env, From, Gas> MissionEscrowProxyMethods<Env, From, (), Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    Gas: TxGas<Env>,
{
    pub fn init<Arg0: ProxyArg<OptionalValue<ManagedAddress<Env::Api>>>>(
        self,
        admin: Arg0,
    ) -> TxTypedDeploy<Env, From, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_deploy()
            .argument(&admin)
            .original_result()
    }
}

impl<Env, From, To, Gas> MissionEscrowProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    pub fn initialize<
        Arg0: ProxyArg<ManagedAddress<Env::Api>>,
        Arg1: ProxyArg<ManagedAddress<Env::Api>>,
        Arg2: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg3: ProxyArg<ManagedBuffer<Env::Api>>,
        Arg4: ProxyArg<u64>,
    >(
        self,
        client: Arg0,
        talent: Arg1,
        content_hash: Arg2,
        due_date: Arg3,
        percentage_admin: Arg4,
    ) -> TxTypedCall<Env, From, To, (), Gas, ()> {
        self.wrapped_tx
            .raw_call("initialize")
            .argument(&client)
            .argument(&talent)
            .argument(&content_hash)
            .argument(&due_date)
            .argument(&percentage_admin)
            .original_result()
    }
}
