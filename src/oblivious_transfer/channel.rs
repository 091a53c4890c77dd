use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use tracing::trace;

use crate::crypto_error::ProtocolError;

// ============================================================================
// Channel — file FIFO de messages texte partagée entre deux threads
//
// Arc<(Mutex<VecDeque<String>>, Condvar)> :
//   - Arc     : chaque extrémité garde un clone, libéré avec la dernière
//   - Mutex   : la file n'est modifiée que sous verrou
//   - Condvar : take() dort jusqu'à l'arrivée d'un message ou l'expiration
//
// offer() ne bloque jamais. take() bloque au plus `timeout`.
// Un verrou empoisonné devient ProtocolError::ChannelPoisoned.
// ============================================================================
#[derive(Clone, Default)]
pub struct Channel {
    inner: Arc<(Mutex<VecDeque<String>>, Condvar)>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<String>>, ProtocolError> {
        self.inner.0.lock().map_err(|_| ProtocolError::ChannelPoisoned)
    }

    pub fn offer(&self, message: String) -> Result<(), ProtocolError> {
        let mut queue = self.lock()?;
        queue.push_back(message);
        trace!(pending = queue.len(), "message déposé");
        self.inner.1.notify_one();
        Ok(())
    }

    pub fn take(&self, timeout: Duration) -> Result<String, ProtocolError> {
        let queue = self.lock()?;
        let (mut queue, _) = self
            .inner
            .1
            .wait_timeout_while(queue, timeout, |q| q.is_empty())
            .map_err(|_| ProtocolError::ChannelPoisoned)?;

        queue.pop_front().ok_or(ProtocolError::Timeout(timeout))
    }

    /// Nombre de messages en attente.
    pub fn pending(&self) -> Result<usize, ProtocolError> {
        Ok(self.lock()?.len())
    }
}

// ============================================================================
// Transport — une extrémité : on lit `inbound`, on écrit `outbound`
// ============================================================================
#[derive(Clone, Default)]
pub struct Transport {
    pub inbound:  Channel,
    pub outbound: Channel,
}

impl Transport {
    /// Deux extrémités croisées : ce que l'une écrit, l'autre le lit.
    pub fn pair() -> (Transport, Transport) {
        let forward = Channel::new();
        let backward = Channel::new();
        (
            Transport { inbound: backward.clone(), outbound: forward.clone() },
            Transport { inbound: forward, outbound: backward },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_fifo_order() {
        let channel = Channel::new();
        for i in 0..3 {
            channel.offer(format!("m{i}")).unwrap();
        }
        assert_eq!(channel.pending().unwrap(), 3);
        for i in 0..3 {
            assert_eq!(channel.take(Duration::from_millis(10)).unwrap(), format!("m{i}"));
        }
    }

    #[test]
    fn test_take_times_out() {
        let channel = Channel::new();
        let start = Instant::now();
        let timeout = Duration::from_millis(30);
        assert_eq!(channel.take(timeout), Err(ProtocolError::Timeout(timeout)));
        assert!(start.elapsed() >= timeout);
    }

    #[test]
    fn test_cross_thread_delivery() {
        let (left, right) = Transport::pair();
        let handle = thread::spawn(move || {
            let request = right.inbound.take(Duration::from_secs(5)).unwrap();
            right.outbound.offer(format!("{request} reçu")).unwrap();
        });

        left.outbound.offer("ping".to_string()).unwrap();
        assert_eq!(left.inbound.take(Duration::from_secs(5)).unwrap(), "ping reçu");
        handle.join().unwrap();
    }

    #[test]
    fn test_poisoned_lock() {
        let channel = Channel::new();
        let clone = channel.clone();
        let _ = thread::spawn(move || {
            let _guard = clone.inner.0.lock().unwrap();
            panic!("panique sous verrou");
        })
        .join();

        assert_eq!(channel.offer("x".into()), Err(ProtocolError::ChannelPoisoned));
        assert_eq!(
            channel.take(Duration::from_millis(1)),
            Err(ProtocolError::ChannelPoisoned)
        );
    }
}
