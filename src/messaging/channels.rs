// Lock-free channel between the clock thread and the UI

use crate::messaging::notification::Notification;
use crate::sequencer::clock::{ObserverGone, TickObserver};
use ringbuf::{
    HeapRb,
    traits::{Observer, Producer, Split},
};

pub type NotificationProducer = ringbuf::HeapProd<Notification>;
pub type NotificationConsumer = ringbuf::HeapCons<Notification>;

pub fn create_notification_channel(
    capacity: usize,
) -> (NotificationProducer, NotificationConsumer) {
    let rb = HeapRb::<Notification>::new(capacity);
    rb.split()
}

/// Clock-side adapter feeding the visual counter through the ring buffer.
///
/// A full buffer drops the update: the UI is lagging and the beat must not
/// wait for it. A dropped consumer reads as [`ObserverGone`], which stops the
/// clock.
pub struct ChannelObserver {
    tx: NotificationProducer,
}

impl ChannelObserver {
    pub fn new(tx: NotificationProducer) -> Self {
        Self { tx }
    }
}

impl TickObserver for ChannelObserver {
    fn on_tick_boundary(&mut self, beat: usize) -> Result<(), ObserverGone> {
        // The consumer half releases its hold when the UI drops it.
        if !self.tx.read_is_held() {
            return Err(ObserverGone);
        }
        let _ = self.tx.try_push(Notification::BeatCounter(beat));
        Ok(())
    }
}
