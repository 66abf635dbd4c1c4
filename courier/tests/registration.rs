//! Handler discovery and registry construction.

use courier::{
    ConfigurationError, ConflictPolicy, HandlerRegistry, Mediator, MediatorConfig, Module,
    RequestSender, ServiceCollection, TypeKey,
};

mod common;
use common::{
    Calls, CountingGreetHandler, Greet, GreetHandler, Ping, Record, RecordHandler, ShoutHandler,
    init_tracing,
};

static GREETINGS: Module = courier::module!("greetings" => [GreetHandler: Greet]);
static SHOUTING: Module = courier::module!("shouting" => [ShoutHandler: Greet]);
static EMPTY: Module = courier::module!("empty" => []);

#[test]
fn test_no_modules_is_a_configuration_error() {
    let result = Mediator::from_config(&MediatorConfig::new(), ServiceCollection::new());

    assert!(matches!(result, Err(ConfigurationError::NoModules)));
}

#[test]
fn test_registry_without_modules() {
    let err = HandlerRegistry::register(&[], &mut ServiceCollection::new()).unwrap_err();
    assert_eq!(err.to_string(), "no modules supplied");
}

#[tokio::test]
async fn test_module_without_handlers_is_valid() {
    init_tracing();
    let config = MediatorConfig::new().with_module(EMPTY.clone());
    let mediator = Mediator::from_config(&config, ServiceCollection::new()).unwrap();

    assert!(mediator.dispatcher().registry().is_empty());
    let err = mediator.execute(Ping).await.unwrap_err();
    assert!(err.is_no_handler());
}

#[test]
fn test_discovery_announces_handlers() {
    let mut services = ServiceCollection::new();
    let config = MediatorConfig::new().with_module(GREETINGS.clone());

    let registry = config.load_handlers(&mut services).unwrap();

    assert_eq!(registry.len(), 1);
    assert!(services.is_handler(&TypeKey::of::<GreetHandler>()));
    assert_eq!(
        services.missing_handlers(),
        vec![TypeKey::of::<GreetHandler>()]
    );
}

#[tokio::test]
async fn test_same_handler_in_two_modules_runs_once() {
    init_tracing();
    let calls = Calls::default();
    let mut services = ServiceCollection::new();
    let greet_calls = calls.clone();
    services.add_scoped(move |_| {
        Ok(CountingGreetHandler {
            calls: greet_calls.clone(),
        })
    });

    let mut config = MediatorConfig::new();
    config
        .add_module(Module::new("m1").with_handler::<CountingGreetHandler, Greet>())
        .add_module(Module::new("m2").with_handler::<CountingGreetHandler, Greet>());
    let mediator = Mediator::from_config(&config, services).unwrap();

    assert_eq!(mediator.dispatcher().registry().len(), 1);

    mediator
        .send(Greet {
            name: "Ada".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(calls.greet(), 1);
}

#[tokio::test]
async fn test_first_discovered_handler_wins() {
    init_tracing();
    let mut services = ServiceCollection::new();
    services
        .add_scoped(|_| Ok(GreetHandler))
        .add_scoped(|_| Ok(ShoutHandler));

    let config = MediatorConfig::new()
        .with_module(GREETINGS.clone())
        .with_module(SHOUTING.clone());
    let mediator = Mediator::from_config(&config, services).unwrap();

    let response = mediator
        .send(Greet {
            name: "Ada".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response, "Hello, Ada");
}

#[test]
fn test_reject_policy_refuses_conflicts() {
    let config = MediatorConfig::new()
        .with_module(SHOUTING.clone())
        .with_module(GREETINGS.clone())
        .conflict_policy(ConflictPolicy::Reject);

    let result = Mediator::from_config(&config, ServiceCollection::new());

    match result {
        Err(ConfigurationError::ConflictingHandlers {
            request,
            existing,
            rejected,
        }) => {
            assert!(request.is::<Greet>());
            assert!(existing.is::<ShoutHandler>());
            assert!(rejected.is::<GreetHandler>());
        }
        Err(other) => panic!("expected a conflict, got {other:?}"),
        Ok(_) => panic!("expected a conflict"),
    }
}

#[test]
fn test_rejected_config_leaves_services_untouched() {
    let mut services = ServiceCollection::new();
    let config = MediatorConfig::new()
        .with_module(GREETINGS.clone())
        .with_module(SHOUTING.clone())
        .conflict_policy(ConflictPolicy::Reject);

    assert!(config.load_handlers(&mut services).is_err());

    assert!(!services.is_handler(&TypeKey::of::<GreetHandler>()));
    assert!(!services.is_handler(&TypeKey::of::<ShoutHandler>()));
    assert!(services.missing_handlers().is_empty());
}

#[test]
fn test_config_keeps_module_order() {
    let config = MediatorConfig::new()
        .with_module(GREETINGS.clone())
        .with_module(Module::new("records").with_handler::<RecordHandler, Record>());

    let names: Vec<_> = config.modules().iter().map(Module::name).collect();
    assert_eq!(names, vec!["greetings", "records"]);
    assert_eq!(config.policy(), ConflictPolicy::FirstWins);
}
