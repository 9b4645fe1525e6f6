#![no_std]

multiversx_sc_wasm_adapter::allocator!();
multiversx_sc_wasm_adapter::panic_handler!();

multiversx_sc_wasm_adapter::endpoints! {
    rejecting_escrow_mock
    (
        init => init
        upgrade => upgrade
        initialize => initialize
        getAdmin => admin
    )
}

multiversx_sc_wasm_adapter::async_callback_empty! {}
