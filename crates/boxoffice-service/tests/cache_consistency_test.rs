//! End-to-end cache behaviour through the services: loaders are spared on
//! hits, writes are visible to the next read, and prices follow inventory.

mod common;

use boxoffice_config::CacheConfig;
use boxoffice_core::{PricingRule, Repository, UserId, UserRole};
use boxoffice_service::cache_keys::{self, views};
use boxoffice_service::{
    BookingService, CacheAside, CacheInterface, CacheInvalidator, CreateBookingRequest,
    EntityKind, EventService, InvalidationSet, UpdateEventRequest, Viewer,
};
use common::Harness;
use std::sync::Arc;
use std::time::Duration;

fn attendee() -> Viewer {
    Viewer::user(UserId::new(), UserRole::User)
}

#[tokio::test]
async fn test_loader_runs_once_then_never_while_cached() {
    let harness = Harness::new();
    let event = harness.seed_event(0).await;
    let viewer = attendee();

    harness.event_service.get_event(&viewer, event.id).await.unwrap();
    assert_eq!(harness.events.lookups(), 1);

    for _ in 0..5 {
        harness.event_service.get_event(&viewer, event.id).await.unwrap();
    }
    assert_eq!(harness.events.lookups(), 1);
}

#[tokio::test]
async fn test_read_after_write_sees_the_update() {
    let harness = Harness::new();
    let event = harness.seed_event(0).await;
    let owner = Viewer::user(event.created_by, UserRole::Organizer);

    let before = harness.event_service.get_event(&owner, event.id).await.unwrap();
    assert_eq!(before.venue, "Pier 4");

    harness
        .event_service
        .update_event(
            &owner,
            event.id,
            UpdateEventRequest {
                venue: Some("Pier 9".to_string()),
                ..UpdateEventRequest::default()
            },
        )
        .await
        .unwrap();

    let after = harness.event_service.get_event(&owner, event.id).await.unwrap();
    assert_eq!(after.venue, "Pier 9");
}

#[tokio::test]
async fn test_event_mutation_clears_every_dependent_key() {
    let store: Arc<dyn CacheInterface> = Arc::new(boxoffice_service::MemoryCacheStore::new());
    let invalidator = CacheInvalidator::new(Arc::clone(&store));
    let event_id = boxoffice_core::EventId::new();
    let owner = UserId::new();

    let keys = [
        cache_keys::by_id(EntityKind::Event, event_id),
        cache_keys::by_owner(EntityKind::Event, owner),
        cache_keys::list_view(EntityKind::Event, views::APPROVED),
        cache_keys::list_view(EntityKind::Event, views::PENDING),
    ];
    for key in &keys {
        store.set_raw(key, "[]", Duration::from_secs(300)).await.unwrap();
    }
    let unrelated = cache_keys::by_id(EntityKind::Event, boxoffice_core::EventId::new());
    store.set_raw(&unrelated, "{}", Duration::from_secs(300)).await.unwrap();

    let removed = invalidator.on_event_mutation(event_id, owner).await.unwrap();
    assert_eq!(removed, 4);
    for key in &keys {
        assert!(store.get_raw(key).await.unwrap().is_none(), "{key} survived");
    }
    assert!(store.exists(&unrelated).await.unwrap());

    // A second pass finds nothing left to remove and still succeeds.
    assert_eq!(invalidator.on_event_mutation(event_id, owner).await.unwrap(), 0);
}

#[test]
fn test_booking_mutation_covers_seat_and_booking_lists() {
    let event_id = boxoffice_core::EventId::new();
    let user_id = UserId::new();
    let set = InvalidationSet::for_booking(event_id, user_id);

    assert!(set.contains(&cache_keys::seat_map(event_id)));
    assert!(set.contains(&cache_keys::bookings_for_event(event_id)));
    assert!(set.contains(&cache_keys::bookings_for_user(user_id)));
}

#[tokio::test]
async fn test_booking_reprices_the_next_read() {
    let harness = Harness::new();
    // 11 seats left: no surge yet.
    let event = harness.seed_event(89).await;
    let buyer = attendee();

    let before = harness.event_service.get_event(&buyer, event.id).await.unwrap();
    assert_eq!(before.current_ticket_price, Some(100.0));

    let booking = harness
        .booking_service
        .create_booking(
            &buyer,
            CreateBookingRequest {
                event_id: event.id,
                seat_number: "K12".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(booking.ticket_price, 100.0);

    // 10 seats left: the first rule now applies.
    let after = harness.event_service.get_event(&buyer, event.id).await.unwrap();
    assert_eq!(after.available_seats, 10);
    assert_eq!(after.current_ticket_price, Some(110.0));
}

#[tokio::test]
async fn test_surge_prices_follow_inventory() {
    let harness = Harness::new();
    let viewer = attendee();

    for (sold, expected) in [(92, 110.0), (96, 132.0), (50, 100.0)] {
        let event = harness.seed_event(sold).await;
        let response = harness.event_service.get_event(&viewer, event.id).await.unwrap();
        assert_eq!(response.current_ticket_price, Some(expected), "sold = {sold}");
    }
}

#[tokio::test]
async fn test_wide_threshold_schedule_compounds() {
    let harness = Harness::new();
    let viewer = attendee();
    let schedule = vec![PricingRule::new(50, 10.0), PricingRule::new(20, 20.0)];

    for (sold, expected) in [(60, 110.0), (85, 132.0), (10, 100.0)] {
        let event = harness.seed_event_with_rules(sold, schedule.clone()).await;
        let response = harness.event_service.get_event(&viewer, event.id).await.unwrap();
        assert_eq!(response.current_ticket_price, Some(expected), "sold = {sold}");
    }
}

#[tokio::test]
async fn test_organizer_sees_rules_not_current_price() {
    let harness = Harness::new();
    let event = harness.seed_event(96).await;
    let owner = Viewer::user(event.created_by, UserRole::Organizer);

    let response = harness.event_service.get_event(&owner, event.id).await.unwrap();
    assert_eq!(response.current_ticket_price, None);
    assert_eq!(response.ticket_price, 100.0);
    assert!(response.dynamic_pricing.is_some());
}

#[tokio::test]
async fn test_disabled_cache_always_calls_loader() {
    let config = CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    };
    let harness = Harness::with_aside(|cache| CacheAside::from_config(cache, &config));
    let event = harness.seed_event(0).await;
    let viewer = attendee();

    for _ in 0..3 {
        harness.event_service.get_event(&viewer, event.id).await.unwrap();
    }
    assert_eq!(harness.events.lookups(), 3);
    assert!(!harness
        .store
        .exists(&cache_keys::by_id(EntityKind::Event, event.id))
        .await
        .unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_expired_snapshot_is_reloaded() {
    let harness = Harness::new();
    let event = harness.seed_event(0).await;
    let viewer = attendee();

    harness.event_service.get_event(&viewer, event.id).await.unwrap();
    tokio::time::advance(Duration::from_secs(299)).await;
    harness.event_service.get_event(&viewer, event.id).await.unwrap();
    assert_eq!(harness.events.lookups(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    harness.event_service.get_event(&viewer, event.id).await.unwrap();
    assert_eq!(harness.events.lookups(), 2);
}

#[tokio::test]
async fn test_unknown_event_is_not_cached() {
    let harness = Harness::new();
    let missing = boxoffice_core::EventId::new();

    for _ in 0..2 {
        assert!(harness
            .event_service
            .get_event(&attendee(), missing)
            .await
            .is_err());
    }
    assert_eq!(harness.events.lookups(), 2);
}

#[tokio::test]
async fn test_load_racing_a_write_does_not_cache_the_old_row() {
    let harness = Arc::new(Harness::new());
    let event = harness.seed_event(0).await;
    let event_id = event.id;
    let owner = Viewer::user(event.created_by, UserRole::Organizer);

    // The reader misses, reads the pre-write row and stalls before filling.
    let gate = harness.events.pause_next_lookup();
    let reader = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move { harness.event_service.get_event(&owner, event_id).await })
    };
    gate.reached().await;

    harness
        .event_service
        .update_event(
            &owner,
            event_id,
            UpdateEventRequest {
                venue: Some("Pier 9".to_string()),
                ..UpdateEventRequest::default()
            },
        )
        .await
        .unwrap();

    gate.release();
    let raced = reader.await.unwrap().unwrap();
    assert_eq!(raced.venue, "Pier 4");

    let fresh = harness.event_service.get_event(&owner, event_id).await.unwrap();
    assert_eq!(fresh.venue, "Pier 9");
}

#[tokio::test]
async fn test_event_edit_racing_a_sale_keeps_the_sale() {
    let harness = Arc::new(Harness::new());
    let event = harness.seed_event(0).await;
    let event_id = event.id;
    let owner = Viewer::user(event.created_by, UserRole::Organizer);

    // The edit reads the row and stalls before writing it back.
    let gate = harness.events.pause_next_lookup();
    let edit = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move {
            harness
                .event_service
                .update_event(
                    &owner,
                    event_id,
                    UpdateEventRequest {
                        venue: Some("Pier 9".to_string()),
                        ..UpdateEventRequest::default()
                    },
                )
                .await
        })
    };
    gate.reached().await;

    let sale = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move {
            harness
                .booking_service
                .create_booking(
                    &attendee(),
                    CreateBookingRequest {
                        event_id,
                        seat_number: "A1".to_string(),
                    },
                )
                .await
        })
    };
    tokio::task::yield_now().await;

    gate.release();
    edit.await.unwrap().unwrap();
    sale.await.unwrap().unwrap();

    let stored = harness.events.find_by_id(&event_id).await.unwrap().unwrap();
    assert_eq!(stored.venue, "Pier 9");
    assert_eq!(stored.sold_tickets, 1);
}
