#![no_std]

multiversx_sc_wasm_adapter::allocator!();
multiversx_sc_wasm_adapter::panic_handler!();

multiversx_sc_wasm_adapter::endpoints! {
    mission_escrow
    (
        init => init
        upgrade => upgrade
        initialize => initialize
        acceptMission => accept_mission
        startMission => start_mission
        completeMission => complete_mission
        cancelMission => cancel_mission
        payMission => pay_mission
        deleteContract => delete_contract
        getMission => get_mission
        getStatus => get_status
        getAdmin => get_admin
        getRegistry => get_registry
        isClosed => is_closed
        getEscrowInfo => get_escrow_info
    )
}

multiversx_sc_wasm_adapter::async_callback_empty! {}
