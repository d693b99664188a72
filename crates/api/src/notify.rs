//! Fan-out of order changes to live subscribers.

use domain::Order;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notifications buffered per subscriber before it starts lagging.
pub const NOTIFICATION_CAPACITY: usize = 256;

/// What happened to the order carried by a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderEvent {
    New,
    Update,
    Finalized,
}

/// Message pushed to every WebSocket subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub event: OrderEvent,
    pub order: Order,
}

/// Broadcasts order notifications.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<OrderNotification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderNotification> {
        self.sender.subscribe()
    }

    /// Sends a notification, returning how many subscribers received it.
    pub fn publish(&self, event: OrderEvent, order: &Order) -> usize {
        let notification = OrderNotification {
            event,
            order: order.clone(),
        };
        // No subscribers is not an error.
        self.sender.send(notification).unwrap_or(0)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTIFICATION_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = Notifier::default();
        assert_eq!(notifier.publish(OrderEvent::New, &Order::new(1)), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_notifications() {
        let notifier = Notifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();
        let order = Order::new(4);

        assert_eq!(notifier.publish(OrderEvent::Update, &order), 2);

        let received = first.recv().await.unwrap();
        assert_eq!(received.event, OrderEvent::Update);
        assert_eq!(received.order, order);
        assert_eq!(second.recv().await.unwrap().order, order);
    }

    #[test]
    fn test_wire_format() {
        let order = Order::new(1).with_id("abc");
        let json = serde_json::to_value(OrderNotification {
            event: OrderEvent::Finalized,
            order,
        })
        .unwrap();

        assert_eq!(json["event"], "finalized");
        assert_eq!(json["order"]["id"], "abc");
    }
}
