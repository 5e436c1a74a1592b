use core::cell::Cell;

use critical_section::Mutex;

use crate::Error;

/// Table of event sources indexed by peripheral instance number.
///
/// Interrupt trampolines look up the source for their instance and raise on
/// it. Populate the table during initialisation and clear it on teardown;
/// every access to the table itself runs inside a critical section, while
/// the looked-up source is used outside of it.
///
/// ```rust,no_run
/// use embedded_plus::prelude::*;
///
/// static SPI_SOURCES: InterruptRegistry<'static, SpiEventSource<'static, 4>, 3> =
///     InterruptRegistry::new();
///
/// // SPI2 interrupt handler
/// fn spi2_irq() {
///     SPI_SOURCES.dispatch(1, |source| source.raise_event(SpiEventType::Receive, Some(2)));
/// }
/// ```
pub struct InterruptRegistry<'a, S, const N: usize> {
    table: Mutex<Cell<[Option<&'a S>; N]>>,
}

impl<'a, S, const N: usize> InterruptRegistry<'a, S, N> {
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(Cell::new([None; N])),
        }
    }

    /// Binds `source` to `instance`.
    pub fn register(&self, instance: usize, source: &'a S) -> Result<(), Error> {
        critical_section::with(|cs| {
            let cell = self.table.borrow(cs);
            let mut table = cell.get();
            let entry = table.get_mut(instance).ok_or(Error::InvalidInstance)?;
            if entry.is_some() {
                #[cfg(feature = "defmt")]
                defmt::warn!("instance {} already registered", instance);
                return Err(Error::AlreadyRegistered);
            }
            *entry = Some(source);
            cell.set(table);
            Ok(())
        })
    }

    /// Removes and returns the source bound to `instance`.
    pub fn unregister(&self, instance: usize) -> Option<&'a S> {
        critical_section::with(|cs| {
            let cell = self.table.borrow(cs);
            let mut table = cell.get();
            let previous = table.get_mut(instance)?.take();
            cell.set(table);
            previous
        })
    }

    pub fn lookup(&self, instance: usize) -> Option<&'a S> {
        critical_section::with(|cs| self.table.borrow(cs).get().get(instance).copied().flatten())
    }

    /// Looks up `instance` and hands its source to `f`.
    ///
    /// Returns false when no source is registered, in which case `f` is not called.
    #[inline]
    pub fn dispatch(&self, instance: usize, f: impl FnOnce(&'a S)) -> bool {
        match self.lookup(instance) {
            Some(source) => {
                f(source);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.table.borrow(cs).set([None; N]));
    }
}

impl<S, const N: usize> Default for InterruptRegistry<'_, S, N> {
    fn default() -> Self {
        Self::new()
    }
}
