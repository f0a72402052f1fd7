//! Notification dispatcher.
//!
//! [`NotificationDispatcher::dispatch`] turns a ticket event into at most one
//! send per channel for the ticket's assignee. Lookups happen inline; the
//! sends themselves are handed to the [`BackgroundRunner`] and the call
//! returns without waiting for them. Nothing is ever reported back to the
//! caller: a ticket mutation succeeds regardless of what happens here.

use std::sync::Arc;

use helpdesk_core::channels::Channel;
use helpdesk_core::event::{EventType, NotificationEvent};
use helpdesk_core::recipient::{DeliveryTarget, Recipient};
use helpdesk_core::template::{
    email_settings_confirmation, gateway_settings_confirmation, push_settings_confirmation,
    render, OutboundMessage,
};
use tracing::Instrument;

use crate::delivery::ChannelSenders;
use crate::ports::TicketDirectory;
use crate::runner::{BackgroundRunner, RunnerStatus};

/// Routes ticket events to the assignee's enabled channels.
#[derive(Clone)]
pub struct NotificationDispatcher {
    directory: Arc<dyn TicketDirectory>,
    senders: ChannelSenders,
    runner: BackgroundRunner,
    public_base_url: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(
        directory: Arc<dyn TicketDirectory>,
        senders: ChannelSenders,
        runner: BackgroundRunner,
    ) -> Self {
        Self {
            directory,
            senders,
            runner,
            public_base_url: None,
        }
    }

    /// Base URL used for the `View:` link in message bodies.
    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Queue state of the runner that carries this dispatcher's sends.
    pub fn runner_status(&self) -> RunnerStatus {
        self.runner.status()
    }

    /// Notify the assignee of `event.ticket_id` through every enabled
    /// channel.
    ///
    /// Returns once the sends are scheduled. Missing tickets or users,
    /// unassigned tickets, self-triggered events and unknown event types
    /// schedule nothing.
    pub async fn dispatch(&self, event: &NotificationEvent) {
        let span = tracing::info_span!(
            "notify",
            ticket_id = event.ticket_id,
            event_type = %event.event_type,
            triggering_user_id = ?event.triggering_user_id,
        );
        self.dispatch_inner(event).instrument(span).await;
    }

    async fn dispatch_inner(&self, event: &NotificationEvent) {
        let ticket = match self.directory.ticket(event.ticket_id).await {
            Ok(Some(ticket)) => ticket,
            Ok(None) => {
                tracing::warn!("Ticket not found, no notification sent");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load ticket for notification");
                return;
            }
        };

        let Some(assignee_id) = ticket.assigned_to else {
            tracing::info!("Ticket is not assigned, no notification sent");
            return;
        };

        let recipient = match self.directory.recipient(assignee_id).await {
            Ok(Some(recipient)) => recipient,
            Ok(None) => {
                tracing::warn!(assignee_id, "Assigned user not found, no notification sent");
                return;
            }
            Err(e) => {
                tracing::error!(assignee_id, error = %e, "Failed to load assignee for notification");
                return;
            }
        };

        if event.triggering_user_id == Some(recipient.id) {
            tracing::info!(
                recipient = recipient.id,
                "Assignee triggered the event, skipping self-notification"
            );
            return;
        }

        let Some(event_type) = EventType::parse(&event.event_type) else {
            tracing::warn!("Unknown event type, no notification sent");
            return;
        };

        let message = render(event_type, &ticket, self.public_base_url.as_deref());
        let targets = recipient.delivery_targets();
        tracing::info!(
            recipient = recipient.id,
            username = %recipient.username,
            channels = targets.len(),
            "Scheduling notifications"
        );

        for target in targets {
            self.schedule(target, message.clone());
        }
    }

    /// Send each enabled channel its confirmation message after the user
    /// saved their notification preferences.
    pub fn send_settings_confirmation(&self, recipient: &Recipient) {
        let span = tracing::info_span!("notify_settings", recipient = recipient.id);
        let _enter = span.enter();

        for channel in Channel::ALL {
            let Some(target) = recipient.target_for(channel) else {
                continue;
            };
            let message = match channel {
                Channel::Email => email_settings_confirmation(),
                Channel::Push => push_settings_confirmation(),
                Channel::Gateway => gateway_settings_confirmation(),
            };
            self.schedule(target, message);
        }
    }

    fn schedule(&self, target: DeliveryTarget, message: OutboundMessage) {
        let channel = target.channel();
        let notifier = self.senders.for_channel(channel);
        tracing::debug!(channel = %channel, "Queuing notification");
        self.runner.run(channel.as_str(), async move {
            notifier.send(target, message).await;
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
