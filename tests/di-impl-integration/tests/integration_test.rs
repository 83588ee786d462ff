//! Centralized integration tests for di-impl crate
use di_abstractions::{ComponentResolver, ContainerConfig, DiContainer, ResolveContext};
use di_impl::{provider, try_provider, Container};
use infrastructure_common::{Closable, CloseResult, Component, DependencyError, TypeInfo};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// 关闭顺序记录
type CloseLog = Rc<RefCell<Vec<&'static str>>>;

/// 应用配置
#[derive(Debug)]
struct Settings {
    dsn: String,
    pool_size: usize,
}

impl Component for Settings {}

/// 连接池，持有外部资源
#[derive(Debug)]
struct ConnectionPool {
    dsn: String,
    size: usize,
    log: CloseLog,
}

impl Closable for ConnectionPool {
    fn close(&self) -> CloseResult {
        self.log.borrow_mut().push("pool");
        Ok(())
    }
}

impl Component for ConnectionPool {
    fn as_closable(&self) -> Option<&dyn Closable> {
        Some(self)
    }
}

/// 仓储
#[derive(Debug)]
struct CampaignRepository {
    pool: Rc<ConnectionPool>,
}

impl Component for CampaignRepository {}

/// 业务服务，关闭时刷新缓冲
#[derive(Debug)]
struct CampaignService {
    repository: Rc<CampaignRepository>,
    settings: Rc<Settings>,
    log: CloseLog,
    flushed: Cell<bool>,
}

impl Closable for CampaignService {
    fn close(&self) -> CloseResult {
        self.flushed.set(true);
        self.log.borrow_mut().push("service");
        Ok(())
    }
}

impl Component for CampaignService {
    fn as_closable(&self) -> Option<&dyn Closable> {
        Some(self)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("无效的连接串: {0}")]
struct InvalidDsn(String);

fn build_container(dsn: &'static str, log: &CloseLog) -> Container {
    let pool_log = log.clone();
    let service_log = log.clone();

    Container::builder()
        .provide(move || Settings {
            dsn: dsn.to_string(),
            pool_size: 4,
        })
        .try_provide(move |settings: Rc<Settings>| {
            if !settings.dsn.starts_with("mysql://") {
                return Err(InvalidDsn(settings.dsn.clone()));
            }
            Ok(ConnectionPool {
                dsn: settings.dsn.clone(),
                size: settings.pool_size,
                log: pool_log.clone(),
            })
        })
        .provide(|pool: Rc<ConnectionPool>| CampaignRepository { pool })
        .provide(
            move |repository: Rc<CampaignRepository>, settings: Rc<Settings>| CampaignService {
                repository,
                settings,
                log: service_log.clone(),
                flushed: Cell::new(false),
            },
        )
        .build()
        .unwrap()
}

#[test]
fn test_object_graph_wiring() {
    let log = CloseLog::default();
    let mut container = build_container("mysql://localhost/ads", &log);
    assert!(container.validate().is_ok());

    let mut service = None;
    container
        .consume(|s: Rc<CampaignService>| service = Some(s))
        .unwrap();
    let service = service.unwrap();

    let settings = container.resolve::<Settings>().unwrap();
    let pool = container.resolve::<ConnectionPool>().unwrap();
    assert!(Rc::ptr_eq(&service.settings, &settings));
    assert!(Rc::ptr_eq(&service.repository.pool, &pool));
    assert_eq!(pool.dsn, "mysql://localhost/ads");
    assert_eq!(pool.size, 4);
    assert_eq!(container.stats().cached_instances, 4);
}

#[test]
fn test_close_releases_dependents_first() {
    let log = CloseLog::default();
    let mut container = build_container("mysql://localhost/ads", &log);
    let service = container.resolve::<CampaignService>().unwrap();

    container.close().unwrap();

    assert!(service.flushed.get());
    assert_eq!(*log.borrow(), vec!["service", "pool"]);
}

#[test]
fn test_close_in_creation_order() {
    let log = CloseLog::default();
    let pool_log = log.clone();
    let service_log = log.clone();
    let mut container = Container::builder()
        .with_config(ContainerConfig {
            close_in_reverse_order: false,
            ..ContainerConfig::default()
        })
        .provide(move || ConnectionPool {
            dsn: String::new(),
            size: 1,
            log: pool_log.clone(),
        })
        .provide(|pool: Rc<ConnectionPool>| CampaignRepository { pool })
        .provide(move |repository: Rc<CampaignRepository>| CampaignService {
            repository,
            settings: Rc::new(Settings {
                dsn: String::new(),
                pool_size: 1,
            }),
            log: service_log.clone(),
            flushed: Cell::new(false),
        })
        .build()
        .unwrap();

    container.resolve::<CampaignService>().unwrap();
    container.close().unwrap();

    assert_eq!(*log.borrow(), vec!["pool", "service"]);
}

#[test]
fn test_construction_error_keeps_provider_error() {
    let log = CloseLog::default();
    let mut container = build_container("postgres://localhost/ads", &log);

    let error = container.resolve::<CampaignService>().unwrap_err();
    let source = error.construction_source().unwrap();
    assert_eq!(source.to_string(), "无效的连接串: postgres://localhost/ads");
    assert!(source.downcast_ref::<InvalidDsn>().is_some());

    // Settings 已构造，连接池失败被缓存，仓储和服务都未创建
    let stats = container.stats();
    assert_eq!(stats.cached_instances, 2);
    assert_eq!(stats.failed_constructions, 1);

    container.close().unwrap();
    assert!(log.borrow().is_empty());
}

#[test]
fn test_validate_reports_all_problems() {
    struct Orphan;
    impl Component for Orphan {}
    struct Left;
    impl Component for Left {}
    struct Right;
    impl Component for Right {}

    let container = Container::new([
        provider(|_: Rc<Settings>| Orphan),
        provider(|_: Rc<Right>| Left),
        provider(|_: Rc<Left>| Right),
    ])
    .unwrap();

    let errors = container.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(DependencyError::is_unresolved));
    assert!(errors
        .iter()
        .any(|error| matches!(error, DependencyError::CircularDependency { .. })));
}

#[test]
fn test_depth_limit() {
    struct Level1;
    impl Component for Level1 {}
    struct Level2;
    impl Component for Level2 {}
    struct Level3;
    impl Component for Level3 {}

    let providers = || {
        [
            provider(|| Level1),
            provider(|_: Rc<Level1>| Level2),
            provider(|_: Rc<Level2>| Level3),
        ]
    };

    let mut shallow = Container::with_config(
        ContainerConfig {
            max_resolution_depth: 2,
            ..ContainerConfig::default()
        },
        providers(),
    )
    .unwrap();
    assert!(matches!(
        shallow.resolve::<Level3>(),
        Err(DependencyError::ResolutionDepthExceeded { max_depth: 2, .. })
    ));
    assert!(shallow.resolve::<Level2>().is_ok());

    let mut deep = Container::new(providers()).unwrap();
    assert!(deep.resolve::<Level3>().is_ok());
}

#[test]
fn test_config_from_host_json() {
    let config: ContainerConfig =
        serde_json::from_str(r#"{ "close_in_reverse_order": false }"#).unwrap();
    let container = Container::builder().with_config(config).build().unwrap();

    assert!(!container.config().close_in_reverse_order);
    assert_eq!(
        container.config().max_resolution_depth,
        ResolveContext::default().max_depth
    );
}

/// 只依赖解析器接口的辅助函数
fn describe<R: ComponentResolver>(resolver: &mut R) -> anyhow::Result<String> {
    let pool = resolver.resolve::<ConnectionPool>()?;
    Ok(format!("{}#{}", pool.dsn, pool.size))
}

#[test]
fn test_generic_resolver_usage() {
    let log = CloseLog::default();
    let mut container = build_container("mysql://db", &log);

    assert_eq!(describe(&mut container).unwrap(), "mysql://db#4");
    assert!(container.can_resolve(&TypeInfo::of::<ConnectionPool>()));
    assert_eq!(container.registered_types().len(), 4);
}

#[test]
fn test_inject_into_host_field() {
    struct Host {
        service: Option<Rc<CampaignService>>,
    }

    let log = CloseLog::default();
    let mut container = build_container("mysql://db", &log);
    let mut host = Host { service: None };

    container.inject(&mut host.service).unwrap();

    let repository = container.resolve::<CampaignRepository>().unwrap();
    assert!(Rc::ptr_eq(
        &host.service.as_ref().unwrap().repository,
        &repository
    ));
}

#[test]
fn test_fallible_provider_with_anyhow() {
    struct Token(String);
    impl Component for Token {}

    let mut container = Container::new([try_provider(|| -> anyhow::Result<Token> {
        let value: u32 = "42".parse()?;
        Ok(Token(value.to_string()))
    })])
    .unwrap();

    container
        .consume(|token: Rc<Token>| assert_eq!(token.0, "42"))
        .unwrap();
}
