use crate::db::connect;
use crate::{reservation, service, service_proposal, user};
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn sample_user(role: &str) -> user::NewUser {
    user::NewUser {
        first_name: "Test".into(),
        last_name: "User".into(),
        email: format!("test_{}@example.com", Uuid::new_v4()),
        password_hash: "x".repeat(32),
        role: role.into(),
        city: "Tunis".into(),
        phone: "21612345".into(),
        address: None,
        photo: None,
    }
}

fn pending_reservation(
    proposal_id: Uuid,
    client_id: Uuid,
    provider_id: Uuid,
    time: &str,
) -> reservation::ActiveModel {
    let now = Utc::now().into();
    reservation::ActiveModel {
        id: Set(Uuid::new_v4()),
        proposal_id: Set(proposal_id),
        client_id: Set(client_id),
        provider_id: Set(provider_id),
        day: Set(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()),
        time: Set(time.to_string()),
        status: Set(reservation::STATUS_PENDING.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// Test user CRUD operations
#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let new = sample_user(user::ROLE_CLIENT);
    let email = new.email.clone();
    let created = user::create(&db, new).await?;
    assert_eq!(created.email, email);
    assert_eq!(created.role, user::ROLE_CLIENT);

    let found = user::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().email, email);

    let by_email = user::find_by_email(&db, &email).await?;
    assert_eq!(by_email.unwrap().id, created.id);

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    let gone = user::Entity::find_by_id(created.id).one(&db).await?;
    assert!(gone.is_none());
    Ok(())
}

/// Test proposal creation with its service/provider references
#[tokio::test]
async fn test_proposal_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let svc = service::create(&db, &format!("painting_{}", Uuid::new_v4()), None).await?;
    let provider = user::create(&db, sample_user(user::ROLE_PROVIDER)).await?;

    let created = service_proposal::create(
        &db,
        service_proposal::NewProposal {
            title: "Interior painting".into(),
            service_id: svc.id,
            provider_id: provider.id,
            price: 120.0,
            description: "Walls and ceilings".into(),
        },
    )
    .await?;
    assert!(created.available);

    let listed = service_proposal::Entity::find()
        .filter(service_proposal::Column::ProviderId.eq(provider.id))
        .all(&db)
        .await?;
    assert_eq!(listed.len(), 1);

    // Zero price is rejected before touching the database
    let bad = service_proposal::create(
        &db,
        service_proposal::NewProposal {
            title: "Free".into(),
            service_id: svc.id,
            provider_id: provider.id,
            price: 0.0,
            description: "No".into(),
        },
    )
    .await;
    assert!(bad.is_err());

    service_proposal::Entity::delete_by_id(created.id).exec(&db).await?;
    user::Entity::delete_by_id(provider.id).exec(&db).await?;
    service::Entity::delete_by_id(svc.id).exec(&db).await?;
    Ok(())
}

/// The partial unique index admits any number of pending rows per slot but
/// exactly one confirmed row.
#[tokio::test]
async fn test_confirmed_slot_unique_index() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let proposal_id = Uuid::new_v4();
    let provider_id = Uuid::new_v4();

    let first = pending_reservation(proposal_id, Uuid::new_v4(), provider_id, "10:00")
        .insert(&db)
        .await?;
    let second = pending_reservation(proposal_id, Uuid::new_v4(), provider_id, "10:00")
        .insert(&db)
        .await?;

    // Confirm the first; the second pending row for the same slot stays legal
    let mut am: reservation::ActiveModel = first.clone().into();
    am.status = Set(reservation::STATUS_CONFIRMED.to_string());
    am.update(&db).await?;

    // Confirming the second must hit the partial unique index
    let mut am2: reservation::ActiveModel = second.clone().into();
    am2.status = Set(reservation::STATUS_CONFIRMED.to_string());
    let conflict = am2.update(&db).await;
    assert!(conflict.is_err());

    reservation::Entity::delete_by_id(first.id).exec(&db).await?;
    reservation::Entity::delete_by_id(second.id).exec(&db).await?;
    Ok(())
}
