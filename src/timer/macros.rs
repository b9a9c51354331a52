/// Declares a static global `HIJACK` singleton protected by a
/// `critical_section` mutex.
///
/// # Arguments
/// - `$mic`: the concrete mic-pin type (must implement
///   [`crate::csm::MicPin`]).
///
/// # Example
/// ```rust,ignore
/// init_hijack!(MyMicPinType);
/// ```
#[macro_export]
macro_rules! init_hijack {
    ( $mic:ty ) => {
        pub static HIJACK: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::glue::HiJack<$mic>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Initializes the global `HIJACK` singleton declared by [`init_hijack!`]
/// with a freshly constructed modem driving `$mic`.
///
/// # Example
/// ```rust,ignore
/// setup_hijack!(mic_pin);
/// ```
#[macro_export]
macro_rules! setup_hijack {
    ( $mic:ident ) => {
        $crate::critical_section::with(|cs| {
            HIJACK
                .borrow(cs)
                .replace(Some($crate::glue::HiJack::new($mic)));
        });
    };
}

/// Advances the global `HIJACK`'s transmit state machine by one half-symbol
/// tick. Intended for the platform's tx half-symbol timer interrupt handler.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TX_TIMER() {
///     tick_hijack_tx!();
/// }
/// ```
#[macro_export]
macro_rules! tick_hijack_tx {
    () => {
        $crate::critical_section::with(|cs| {
            if let Some(hj) = HIJACK.borrow(cs).borrow_mut().as_mut() {
                hj.on_tx_tick();
            }
        });
    };
}

/// Feeds one rx edge event into the global `HIJACK`. Intended for the
/// platform's edge-capture interrupt handler.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn MIC_CAPTURE() {
///     let event = read_capture_event();
///     tick_hijack_rx!(event);
/// }
/// ```
#[macro_export]
macro_rules! tick_hijack_rx {
    ( $event:expr ) => {
        $crate::critical_section::with(|cs| {
            if let Some(hj) = HIJACK.borrow(cs).borrow_mut().as_mut() {
                hj.on_rx_edge($event);
            }
        });
    };
}

/// Submits a packet for transmission through the global `HIJACK`. Expands to
/// a boolean: `true` if the coding state machine accepted the serialized
/// buffer, `false` if busy, too long, or not yet set up.
///
/// # Example
/// ```rust,ignore
/// let sent = send_from_hijack!(&packet);
/// ```
#[macro_export]
macro_rules! send_from_hijack {
    ( $pkt:expr ) => {
        $crate::critical_section::with(|cs| match HIJACK.borrow(cs).borrow_mut().as_mut() {
            Some(hj) => hj.send_packet($pkt) == $crate::framing::SendPacketOutcome::Accepted,
            None => false,
        })
    };
}

/// Takes the most recently received, checksum-validated packet from the
/// global `HIJACK`, if any has arrived since the last call.
///
/// # Example
/// ```rust,ignore
/// if let Some(pkt) = receive_from_hijack!() {
///     // handle pkt
/// }
/// ```
#[macro_export]
macro_rules! receive_from_hijack {
    () => {
        $crate::critical_section::with(|cs| {
            HIJACK
                .borrow(cs)
                .borrow_mut()
                .as_mut()
                .and_then(|hj| hj.take_received_packet())
        })
    };
}
