#![no_std]

multiversx_sc_wasm_adapter::allocator!();
multiversx_sc_wasm_adapter::panic_handler!();

multiversx_sc_wasm_adapter::endpoints! {
    mission_registry
    (
        init => init
        upgrade => upgrade
        createMission => create_mission
        setEscrowTemplate => set_escrow_template
        setAdmin => set_admin
        setPercentageAdmin => set_percentage_admin
        setMinDeposit => set_min_deposit
        setPaused => set_paused
        setOwner => set_owner
        getMissions => get_missions
        getMissionsPage => get_missions_page
        getMissionEntry => get_mission_entry
        getProvisioning => get_provisioning
        isMissionIdAvailable => is_mission_id_available
        getMissionCount => get_mission_count
        getConfig => get_config
    )
}

multiversx_sc_wasm_adapter::async_callback! { mission_registry }
