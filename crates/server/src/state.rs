use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthConfig;
use service::auth::AuthService;
use service::reservation::repo::seaorm::{SeaOrmPartyDirectory, SeaOrmReservationRepository};
use service::reservation::ReservationService;

pub type Reservations = ReservationService<SeaOrmReservationRepository, SeaOrmPartyDirectory>;
pub type Auth = AuthService<SeaOrmAuthRepository>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub reservations: Arc<Reservations>,
    pub auth: Arc<Auth>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth_cfg: AuthConfig) -> Self {
        let reservations = Arc::new(ReservationService::new(
            Arc::new(SeaOrmReservationRepository { db: db.clone() }),
            Arc::new(SeaOrmPartyDirectory { db: db.clone() }),
        ));
        let auth = Arc::new(AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            auth_cfg,
        ));
        Self { db, reservations, auth }
    }
}
