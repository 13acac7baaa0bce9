//! Integration tests for AdaptiveClient calls
//!
//! Exercises endpoint selection, fallback and caching through the public
//! API, with a scripted NetworkUtilities behind the stock validators.

use adaptive_client::{
    AdaptiveClientError, AdaptiveClientRuntime, ConfigError, DbServerValidator, EndPointCache,
    EndPointConfiguration, EndPointType, HttpServerValidator, NetworkUtilities, ProviderName,
    RegistrationHelper,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_test::traced_test;

// ===== Test Services =====

trait DummyApi: Send + Sync {
    fn get_string(&self) -> Result<String, ApiError>;
}

trait NotRegistered: Send + Sync {}

#[derive(Debug, PartialEq)]
enum ApiError {
    Backend(String),
    Client(AdaptiveClientError),
}

impl From<AdaptiveClientError> for ApiError {
    fn from(e: AdaptiveClientError) -> Self {
        ApiError::Client(e)
    }
}

struct NamedClient(&'static str);

impl DummyApi for NamedClient {
    fn get_string(&self) -> Result<String, ApiError> {
        Ok(self.0.to_string())
    }
}

struct FailingClient;

impl DummyApi for FailingClient {
    fn get_string(&self) -> Result<String, ApiError> {
        Err(ApiError::Backend("InProcess Exception".to_string()))
    }
}

// ===== Scripted Network =====

/// Answers DB checks from a set of live connection strings and HTTP checks
/// from a single flag, counting every probe.
struct ScriptedNetwork {
    live_db: HashSet<String>,
    http_alive: bool,
    db_calls: AtomicUsize,
    http_calls: AtomicUsize,
}

impl ScriptedNetwork {
    fn new(live_db: &[&str], http_alive: bool) -> Arc<Self> {
        Arc::new(Self {
            live_db: live_db.iter().map(|s| s.to_string()).collect(),
            http_alive,
            db_calls: AtomicUsize::new(0),
            http_calls: AtomicUsize::new(0),
        })
    }

    fn all_db(http_alive: bool) -> Arc<Self> {
        Self::new(&[SQL1, SQL2, MYSQL1], http_alive)
    }

    fn db_calls(&self) -> usize {
        self.db_calls.load(Ordering::SeqCst)
    }

    fn http_calls(&self) -> usize {
        self.http_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkUtilities for ScriptedNetwork {
    async fn verify_db_server_connectivity(&self, connection_string: &str) -> bool {
        self.db_calls.fetch_add(1, Ordering::SeqCst);
        self.live_db.contains(connection_string)
    }

    async fn verify_http_server_availability(&self, _url: &str) -> bool {
        self.http_calls.fetch_add(1, Ordering::SeqCst);
        self.http_alive
    }
}

// ===== Fixture =====

const SQL1: &str = "Server=sql1;Database=App";
const SQL2: &str = "Server=sql2;Database=App";
const MYSQL1: &str = "Server=mysql1;Port=3306;Database=App";
const WEB1: &str = "http://web1/api/";

fn endpoints() -> Vec<EndPointConfiguration> {
    vec![
        EndPointConfiguration::new("Application_SQL1", "Application", "InProcess", "MSSQL", SQL1),
        EndPointConfiguration::new("Application_SQL2", "Application", "InProcess", "MSSQL", SQL2),
        EndPointConfiguration::new("Application_MySQL1", "Application", "InProcess", "MySQL", MYSQL1),
        EndPointConfiguration::new("Application_WebAPI1", "Application", "WebAPI", "", WEB1),
        EndPointConfiguration::new("Application_Retired", "Application", "InProcess", "MSSQL", "Server=retired")
            .active(false),
    ]
}

struct Fixture {
    runtime: Arc<AdaptiveClientRuntime>,
    messages: Arc<Mutex<Vec<String>>>,
}

fn build(network: Arc<ScriptedNetwork>, mssql_client: Arc<dyn DummyApi>) -> Fixture {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let network: Arc<dyn NetworkUtilities> = network;
    let db = Arc::new(DbServerValidator::new(network.clone()));

    let mut helper = RegistrationHelper::new();
    helper
        .register_endpoints(endpoints())
        .unwrap()
        .register_validator(EndPointType::IN_PROCESS, ProviderName::MSSQL, db.clone())
        .unwrap()
        .register_validator(EndPointType::IN_PROCESS, ProviderName::MYSQL, db)
        .unwrap()
        .register_validator(
            EndPointType::WEB_API,
            "",
            Arc::new(HttpServerValidator::new(network)),
        )
        .unwrap()
        .register_service::<dyn DummyApi, _>(
            EndPointType::IN_PROCESS,
            "Application",
            ProviderName::MSSQL,
            move |_| mssql_client.clone(),
        )
        .unwrap()
        .register_service::<dyn DummyApi, _>(
            EndPointType::IN_PROCESS,
            "Application",
            ProviderName::MYSQL,
            |_| Arc::new(NamedClient("InProcessClient3")),
        )
        .unwrap()
        .register_service::<dyn DummyApi, _>(EndPointType::WEB_API, "Application", "", |_| {
            Arc::new(NamedClient("WebAPIClient1"))
        })
        .unwrap()
        .register_logger(move |msg| sink.lock().unwrap().push(msg.to_string()));

    Fixture {
        runtime: helper.build(),
        messages,
    }
}

fn fixture(network: Arc<ScriptedNetwork>) -> Fixture {
    build(network, Arc::new(NamedClient("InProcessClient1")))
}

async fn get_string(client: &mut adaptive_client::AdaptiveClient<dyn DummyApi>) -> Result<String, ApiError> {
    client.call(|api| async move { api.get_string() }).await
}

// ===== Selection Tests =====

#[tokio::test]
async fn test_resolves_first_mssql_endpoint() {
    let f = fixture(ScriptedNetwork::all_db(false));
    let mut client = f.runtime.client::<dyn DummyApi>();

    let result = get_string(&mut client).await;

    assert_eq!(result, Ok("InProcessClient1".to_string()));
    assert_eq!(client.current_endpoint().unwrap().name, "Application_SQL1");
}

#[tokio::test]
async fn test_resolves_mysql_when_mssql_is_down() {
    let f = fixture(ScriptedNetwork::new(&[MYSQL1], false));
    let mut client = f.runtime.client::<dyn DummyApi>();

    let result = get_string(&mut client).await;

    assert_eq!(result, Ok("InProcessClient3".to_string()));
    assert_eq!(client.current_endpoint().unwrap().name, "Application_MySQL1");
}

#[tokio::test]
async fn test_explicit_endpoint_name() {
    let f = fixture(ScriptedNetwork::all_db(false));
    let mut client = f.runtime.client::<dyn DummyApi>();

    assert_eq!(
        get_string(&mut client).await,
        Ok("InProcessClient1".to_string())
    );
    assert_eq!(client.current_endpoint().unwrap().name, "Application_SQL1");

    let result: Result<String, ApiError> = client
        .call_on("Application_MySQL1", |api| async move { api.get_string() })
        .await;

    assert_eq!(result, Ok("InProcessClient3".to_string()));
    assert_eq!(client.current_endpoint().unwrap().name, "Application_MySQL1");
}

#[tokio::test]
async fn test_falls_back_to_web_api() {
    let network = ScriptedNetwork::new(&[], true);
    let f = fixture(network.clone());
    let mut client = f.runtime.client::<dyn DummyApi>();

    let result = get_string(&mut client).await;

    assert_eq!(result, Ok("WebAPIClient1".to_string()));
    assert_eq!(client.current_endpoint().unwrap().name, "Application_WebAPI1");
    assert_eq!(network.db_calls(), 3);
    assert_eq!(network.http_calls(), 1);

    let messages = f.messages.lock().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with("Failed to connect to EndPoint named Application_SQL1"));
    assert!(messages[2].contains("Application_MySQL1"));
}

#[tokio::test]
async fn test_inactive_endpoint_is_never_probed() {
    let network = ScriptedNetwork::new(&[], false);
    let f = fixture(network.clone());
    let mut client = f.runtime.client::<dyn DummyApi>();

    let result = get_string(&mut client).await;

    match result {
        Err(ApiError::Client(AdaptiveClientError::ConnectivityExhausted { attempted, .. })) => {
            assert_eq!(
                attempted,
                vec![
                    "Application_SQL1",
                    "Application_SQL2",
                    "Application_MySQL1",
                    "Application_WebAPI1"
                ]
            );
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(network.db_calls(), 3);
    assert!(client.current_endpoint().is_none());
}

// ===== Configuration Error Tests =====

#[tokio::test]
async fn test_unregistered_service_is_configuration_error() {
    let network = ScriptedNetwork::all_db(true);
    let f = fixture(network.clone());
    let mut client = f.runtime.client::<dyn NotRegistered>();

    let result: Result<(), AdaptiveClientError> = client.call(|_| async { Ok(()) }).await;

    assert!(matches!(
        result,
        Err(AdaptiveClientError::Configuration(ConfigError::NoPerimeterBound(_)))
    ));
    assert_eq!(network.db_calls(), 0);
    assert_eq!(network.http_calls(), 0);
}

// ===== Cache Tests =====

#[tokio::test]
async fn test_uses_cached_endpoint_on_second_call() {
    let network = ScriptedNetwork::new(&[], true);
    let f = fixture(network.clone());

    let mut client1 = f.runtime.client::<dyn DummyApi>();
    assert_eq!(
        get_string(&mut client1).await,
        Ok("WebAPIClient1".to_string())
    );
    assert_eq!(client1.current_endpoint().unwrap().name, "Application_WebAPI1");
    assert_eq!(network.db_calls(), 3);
    assert_eq!(network.http_calls(), 1);

    // A new scope goes straight to the cached endpoint
    let mut client2 = f.runtime.client::<dyn DummyApi>();
    assert_eq!(
        get_string(&mut client2).await,
        Ok("WebAPIClient1".to_string())
    );
    assert_eq!(client2.current_endpoint().unwrap().name, "Application_WebAPI1");
    assert_eq!(network.db_calls(), 3);
    assert_eq!(network.http_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scopes_share_cache() {
    let network = ScriptedNetwork::new(&[SQL2], false);
    let f = fixture(network.clone());

    // Warm the cache, then fan out
    let mut warm = f.runtime.client::<dyn DummyApi>();
    get_string(&mut warm).await.unwrap();
    let probes = network.db_calls();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let runtime = f.runtime.clone();
            tokio::spawn(async move {
                let mut client = runtime.client::<dyn DummyApi>();
                let result = get_string(&mut client).await;
                (result, client.current_endpoint().map(|e| e.name.clone()))
            })
        })
        .collect();

    for joined in futures::future::join_all(tasks).await {
        let (result, endpoint) = joined.unwrap();
        assert_eq!(result, Ok("InProcessClient1".to_string()));
        assert_eq!(endpoint.as_deref(), Some("Application_SQL2"));
    }
    assert_eq!(network.db_calls(), probes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cold_misses_agree() {
    let network = ScriptedNetwork::new(&[SQL2], false);
    let f = fixture(network.clone());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let runtime = f.runtime.clone();
            tokio::spawn(async move {
                let mut client = runtime.client::<dyn DummyApi>();
                let result = get_string(&mut client).await;
                (result, client.current_endpoint().map(|e| e.name.clone()))
            })
        })
        .collect();

    for joined in futures::future::join_all(tasks).await {
        let (result, endpoint) = joined.unwrap();
        assert_eq!(result, Ok("InProcessClient1".to_string()));
        assert_eq!(endpoint.as_deref(), Some("Application_SQL2"));
    }

    // Every miss wrote the same endpoint; the cache holds one entry
    assert_eq!(f.runtime.endpoint_cache().count(), 1);
    assert_eq!(
        f.runtime
            .endpoint_cache()
            .get(&adaptive_client::ServiceKey::of::<dyn DummyApi>())
            .unwrap()
            .name,
        "Application_SQL2"
    );
    // At least one scope probed SQL1 and SQL2; at most every scope did
    assert!(network.db_calls() >= 2 && network.db_calls() <= 16);
}

// ===== Error Propagation Tests =====

#[tokio::test]
async fn test_client_error_is_propagated() {
    let network = ScriptedNetwork::all_db(false);
    let f = build(network.clone(), Arc::new(FailingClient));
    let mut client = f.runtime.client::<dyn DummyApi>();

    let result = get_string(&mut client).await;

    assert_eq!(
        result,
        Err(ApiError::Backend("InProcess Exception".to_string()))
    );
    // The endpoint was reachable; the failure is the client's own
    assert_eq!(client.current_endpoint().unwrap().name, "Application_SQL1");
    assert_eq!(network.db_calls(), 1);
    assert!(f.messages.lock().unwrap().is_empty());
}

// ===== Logging Tests =====

#[traced_test]
#[tokio::test]
async fn test_failed_probe_is_logged() {
    let f = fixture(ScriptedNetwork::new(&[SQL2], false));
    let mut client = f.runtime.client::<dyn DummyApi>();

    get_string(&mut client).await.unwrap();

    assert!(logs_contain("endpoint failed liveness check"));
    assert!(logs_contain("Application_SQL1"));
    assert!(logs_contain("selected endpoint"));
}
