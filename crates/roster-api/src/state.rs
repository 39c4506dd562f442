//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository and picker traits, but AppState pins
//! them to the SQLite repositories and the ChaCha-backed picker.

use std::path::PathBuf;
use std::sync::Arc;

use roster_core::service::pull_request::PullRequestService;
use roster_core::service::team::TeamService;
use roster_core::service::user::UserService;
use roster_infra::config::database_url;
use roster_infra::random::RandomPicker;
use roster_infra::sqlite::pool::DatabasePool;
use roster_infra::sqlite::pull_request::SqlitePullRequestRepository;
use roster_infra::sqlite::team::SqliteTeamRepository;
use roster_infra::sqlite::user::SqliteUserRepository;
use roster_types::config::RosterConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteTeamService = TeamService<SqliteTeamRepository>;

pub type ConcreteUserService = UserService<SqliteUserRepository, SqlitePullRequestRepository>;

pub type ConcretePullRequestService =
    PullRequestService<SqlitePullRequestRepository, SqliteUserRepository, RandomPicker>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub team_service: Arc<ConcreteTeamService>,
    pub user_service: Arc<ConcreteUserService>,
    pub pr_service: Arc<ConcretePullRequestService>,
    pub config: Arc<RosterConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(config: RosterConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        let db_url = database_url(&config, &data_dir);
        let db_pool = DatabasePool::with_options(&db_url, &config.database).await?;
        let picker = RandomPicker::from_config(&config.selection);

        Ok(Self::from_parts(db_pool, picker, config, data_dir))
    }

    /// Wire services over an already opened pool.
    pub fn from_parts(
        db_pool: DatabasePool,
        picker: RandomPicker,
        config: RosterConfig,
        data_dir: PathBuf,
    ) -> Self {
        let team_service = TeamService::new(SqliteTeamRepository::new(db_pool.clone()));
        let user_service = UserService::new(
            SqliteUserRepository::new(db_pool.clone()),
            SqlitePullRequestRepository::new(db_pool.clone()),
        );
        let pr_service = PullRequestService::new(
            SqlitePullRequestRepository::new(db_pool.clone()),
            SqliteUserRepository::new(db_pool.clone()),
            picker,
        );

        Self {
            team_service: Arc::new(team_service),
            user_service: Arc::new(user_service),
            pr_service: Arc::new(pr_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
