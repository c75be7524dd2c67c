//! Two-way, stoppable iteration over container entries.
//!
//! A [`Generator`] is a lazy producer of `(key, value)` pairs. Besides pulling
//! the next pair, the consumer can resume it with a control [`Signal`]: sending
//! [`Signal::Stop`] terminates the producer at its current suspension point, so
//! early exit is decided by the consumer and the producer never has to know
//! about callback return values.
//!
//! ```text
//! consumer                    generator
//! --------                    ---------
//! next()          ───────▶    yield (k0, v0)     [suspended]
//! send(Continue)  ───────▶    yield (k1, v1)     [suspended]
//! send(Stop)      ───────▶    finish             [finished]
//! next()          ───────▶    None
//! ```

use std::iter::FusedIterator;
use std::ops::ControlFlow;

use crate::key::Key;

/// Control value a consumer sends into a suspended [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Continue,
    Stop,
}

/// Conversion of a `for_each` callback result into a [`Signal`].
///
/// Only an explicit `false` (or `Signal::Stop`, or `ControlFlow::Break`) stops
/// iteration. `()` and `true` continue.
pub trait IntoSignal {
    fn into_signal(self) -> Signal;
}

impl IntoSignal for Signal {
    #[inline]
    fn into_signal(self) -> Signal {
        self
    }
}

impl IntoSignal for () {
    #[inline]
    fn into_signal(self) -> Signal {
        Signal::Continue
    }
}

impl IntoSignal for bool {
    #[inline]
    fn into_signal(self) -> Signal {
        if self {
            Signal::Continue
        } else {
            Signal::Stop
        }
    }
}

impl<B, C> IntoSignal for ControlFlow<B, C> {
    #[inline]
    fn into_signal(self) -> Signal {
        match self {
            ControlFlow::Continue(_) => Signal::Continue,
            ControlFlow::Break(_) => Signal::Stop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Not resumed yet; no entry has been produced.
    Created,
    /// Suspended after yielding `current`.
    Suspended,
    Finished,
}

/// A resumable producer of `(key, value)` pairs borrowed from a container.
///
/// Obtained from [`ArrayContainer::generator`](crate::ArrayContainer::generator).
/// Every call to `generator()` starts a fresh pass over the entries.
#[derive(Debug, Clone)]
pub struct Generator<'a, V> {
    entries: ordermap::map::Iter<'a, Key, V>,
    current: Option<(&'a Key, &'a V)>,
    state: State,
}

impl<'a, V> Generator<'a, V> {
    pub(crate) fn new(entries: ordermap::map::Iter<'a, Key, V>) -> Self {
        Self {
            entries,
            current: None,
            state: State::Created,
        }
    }

    /// Resumes the generator with `signal`.
    ///
    /// `Signal::Continue` yields the next entry, or `None` once the entries are
    /// exhausted. `Signal::Stop` finishes the generator and yields nothing;
    /// every later resumption yields `None` as well.
    pub fn send(&mut self, signal: Signal) -> Option<(&'a Key, &'a V)> {
        match signal {
            Signal::Stop => {
                self.stop();
                None
            }
            Signal::Continue => self.resume(),
        }
    }

    /// Finishes the generator without producing further entries.
    pub fn stop(&mut self) {
        if self.state != State::Finished {
            log::trace!("generator stopped by consumer");
        }
        self.finish();
    }

    /// The entry produced by the last resumption, if the generator is suspended.
    #[inline]
    pub fn current(&self) -> Option<(&'a Key, &'a V)> {
        self.current
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Returns `false` until the first resumption.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.state != State::Created
    }

    fn resume(&mut self) -> Option<(&'a Key, &'a V)> {
        if self.state == State::Finished {
            return None;
        }
        match self.entries.next() {
            Some(entry) => {
                self.current = Some(entry);
                self.state = State::Suspended;
                Some(entry)
            }
            None => {
                self.finish();
                None
            }
        }
    }

    fn finish(&mut self) {
        self.current = None;
        self.state = State::Finished;
    }
}

impl<'a, V> Iterator for Generator<'a, V> {
    type Item = (&'a Key, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.send(Signal::Continue)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_finished() {
            (0, Some(0))
        } else {
            self.entries.size_hint()
        }
    }
}

impl<V> FusedIterator for Generator<'_, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entries;

    fn entries() -> Entries<i32> {
        (0..4).map(|i| (Key::Index(i), i as i32 * 10)).collect()
    }

    #[test]
    fn test_generator_yields_in_order() {
        crate::test_util::init_logging();
        let map = entries();
        let generator = Generator::new(map.iter());
        let seen: Vec<_> = generator.map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(
            seen,
            vec![
                (Key::Index(0), 0),
                (Key::Index(1), 10),
                (Key::Index(2), 20),
                (Key::Index(3), 30)
            ]
        );
    }

    #[test]
    fn test_generator_stop_signal_finishes() {
        let map = entries();
        let mut generator = Generator::new(map.iter());
        assert!(!generator.is_started());
        assert_eq!(generator.next(), Some((&Key::Index(0), &0)));
        assert_eq!(generator.current(), Some((&Key::Index(0), &0)));
        assert_eq!(generator.send(Signal::Continue), Some((&Key::Index(1), &10)));
        assert_eq!(generator.send(Signal::Stop), None);
        assert!(generator.is_finished());
        assert_eq!(generator.current(), None);
        assert_eq!(generator.next(), None);
        assert_eq!(generator.send(Signal::Continue), None);
        assert_eq!(generator.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_generator_exhaustion_is_fused() {
        let map = entries();
        let mut generator = Generator::new(map.iter());
        assert_eq!(generator.size_hint(), (4, Some(4)));
        assert_eq!(generator.by_ref().count(), 4);
        assert!(generator.is_finished());
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn test_generator_stop_before_start() {
        let map = entries();
        let mut generator = Generator::new(map.iter());
        generator.stop();
        assert!(generator.is_finished());
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn test_generator_into_signal() {
        assert_eq!(().into_signal(), Signal::Continue);
        assert_eq!(true.into_signal(), Signal::Continue);
        assert_eq!(false.into_signal(), Signal::Stop);
        assert_eq!(ControlFlow::<()>::Break(()).into_signal(), Signal::Stop);
        assert_eq!(ControlFlow::<(), i32>::Continue(1).into_signal(), Signal::Continue);
        assert_eq!(Signal::default(), Signal::Continue);
    }
}
