//! Behaviour of the in-memory repository adapters.

use boxoffice_core::{
    Booking, BookingRepository, BoxOfficeError, DynamicPricing, Email, Event, EventRepository,
    EventStatus, NewEvent, Repository, User, UserId, UserRepository, UserRole,
};
use boxoffice_repository::{
    InMemoryBookingRepository, InMemoryEventRepository, InMemoryUserRepository,
};

fn event_for(organizer: UserId) -> Event {
    Event::new(
        NewEvent {
            name: "Chamber Concert".to_string(),
            description: "Strings".to_string(),
            date: "2026-12-01".to_string(),
            time: "19:00".to_string(),
            venue: "Hall B".to_string(),
            category: "music".to_string(),
            total_seats: 50,
            image_url: None,
            ticket_price: 30.0,
            dynamic_pricing: DynamicPricing::disabled(),
        },
        organizer,
    )
    .unwrap()
}

#[tokio::test]
async fn test_event_filters() {
    let organizer = UserId::new();
    let repo = InMemoryEventRepository::new();

    let pending = repo.save(&event_for(organizer)).await.unwrap();
    let mut approved = event_for(organizer);
    approved.change_status(EventStatus::Approved);
    repo.save(&approved).await.unwrap();
    repo.save(&event_for(UserId::new())).await.unwrap();

    let listed = repo.find_by_status(EventStatus::Approved).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, approved.id);

    assert_eq!(repo.find_by_organizer(&organizer).await.unwrap().len(), 2);
    assert_eq!(repo.find_all().await.unwrap().len(), 3);

    assert!(repo.delete(&pending.id).await.unwrap());
    assert!(!repo.delete(&pending.id).await.unwrap());
}

#[tokio::test]
async fn test_update_unknown_event_is_not_found() {
    let repo = InMemoryEventRepository::new();
    let result = repo.update(&event_for(UserId::new())).await;
    assert!(matches!(result, Err(BoxOfficeError::NotFound { .. })));
}

#[tokio::test]
async fn test_seat_can_only_be_held_once() {
    let repo = InMemoryBookingRepository::new();
    let event = event_for(UserId::new());

    let mut first = Booking::new(event.id, UserId::new(), "C7", 30.0).unwrap();
    repo.save(&first).await.unwrap();

    let second = Booking::new(event.id, UserId::new(), "C7", 30.0).unwrap();
    assert!(matches!(
        repo.save(&second).await,
        Err(BoxOfficeError::Conflict(_))
    ));

    first.cancel().unwrap();
    repo.update(&first).await.unwrap();
    assert!(repo.find_active_by_seat(&event.id, "C7").await.unwrap().is_none());
    repo.save(&second).await.unwrap();
    assert_eq!(repo.find_by_event(&event.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let repo = InMemoryUserRepository::new();
    let user = User::new(
        "Grace".to_string(),
        Email::new("grace@example.com").unwrap(),
        "555 0101".to_string(),
        UserRole::Organizer,
    );
    repo.save(&user).await.unwrap();

    let duplicate = User::new(
        "Other".to_string(),
        Email::new("GRACE@example.com").unwrap(),
        "555 0102".to_string(),
        UserRole::User,
    );
    assert!(repo.save(&duplicate).await.is_err());

    let found = repo
        .find_by_email(&Email::new("Grace@Example.com").unwrap())
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
    assert_eq!(repo.find_by_role(UserRole::Organizer).await.unwrap().len(), 1);
}
