// Messaging - clock → UI notification plumbing

pub mod channels;
pub mod notification;

pub use channels::{
    ChannelObserver, NotificationConsumer, NotificationProducer, create_notification_channel,
};
pub use notification::Notification;
