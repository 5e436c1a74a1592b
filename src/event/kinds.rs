use super::EventSource;

/// Declares a peripheral event kind enum and its matching event source alias.
macro_rules! event_kinds {
    ($prefix:ident, $peripheral:literal { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        paste::paste! {
            #[doc = "Events raised by " $peripheral " interrupt handlers."]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub enum [<$prefix EventType>] {
                $($(#[$vmeta])* $variant),+
            }

            #[doc = "Event source for " $peripheral " interrupts with room for `N` subscribers."]
            pub type [<$prefix EventSource>]<'a, const N: usize> =
                EventSource<'a, [<$prefix EventType>], N>;
        }
    };
}

event_kinds!(Adc, "ADC" {
    RegularEndOfConversion,
    InjectedEndOfConversion,
    AnalogWatchdog,
    Overflow,
});

event_kinds!(Spi, "SPI" {
    Receive,
    ReadyToTransmit,
    CrcError,
    ModeFault,
    Overrun,
});

event_kinds!(Usart, "USART" {
    Receive,
    ReadyToTransmit,
    TransmitComplete,
    Idle,
    ParityError,
    Overrun,
});

event_kinds!(Timer, "timer" {
    Update,
    /// Payload carries the capture/compare channel.
    Compare,
    Trigger,
    Break,
    Commutation,
});

event_kinds!(Dma, "DMA" {
    Complete,
    HalfComplete,
    TransferError,
    FifoError,
});

event_kinds!(Can, "CAN" {
    TransmitMailboxEmpty,
    Fifo0MessagePending,
    Fifo0Full,
    Fifo0Overrun,
    Fifo1MessagePending,
    Fifo1Full,
    Fifo1Overrun,
    ErrorWarning,
    ErrorPassive,
    BusOff,
    LastErrorCode,
    Wakeup,
    Sleep,
});

event_kinds!(I2c, "I2C" {
    StartBitSent,
    AddressSent,
    MasterByteTransmitted,
    MasterByteReceived,
    SlaveAddressMatched,
    SlaveByteReceived,
    SlaveStopDetected,
    BusError,
    ArbitrationLoss,
    AckFailure,
    Overrun,
    PecError,
    Timeout,
    SmbAlert,
});

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn generated_source_alias_dispatches_peripheral_events() {
        let conversions = AtomicU32::new(0);
        let on_adc = |event: crate::event::Event<AdcEventType>| {
            if event.kind == AdcEventType::RegularEndOfConversion {
                conversions.fetch_add(event.payload.unwrap_or(0), Ordering::Relaxed);
            }
        };

        let mut source: AdcEventSource<'_, 2> = EventSource::new();
        source.insert_subscriber(&on_adc).unwrap();

        // ADC1 then ADC3
        source.raise_event(AdcEventType::RegularEndOfConversion, Some(1));
        source.raise_event(AdcEventType::Overflow, Some(2));
        source.raise_event(AdcEventType::RegularEndOfConversion, Some(3));

        assert_eq!(conversions.load(Ordering::Relaxed), 4);
    }
}
