#![allow(dead_code)]

use courier::{Message, Request, RequestHandler};
use std::{
    convert::Infallible,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Test Request Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Greet {
    pub name: String,
}

impl Message for Greet {}
impl Request for Greet {
    type Response = String;
}

#[derive(Clone, Debug)]
pub struct Ping;

impl Message for Ping {}
impl Request for Ping {
    type Response = ();
}

#[derive(Clone, Debug)]
pub struct Record {
    pub entry: String,
}

impl Message for Record {}
impl Request for Record {
    type Response = ();
}

#[derive(Clone, Debug)]
pub struct Withdraw {
    pub amount: u64,
}

impl Message for Withdraw {}
impl Request for Withdraw {
    type Response = u64;
}

#[derive(Clone, Debug)]
pub struct Slow {
    pub delay: Duration,
}

impl Message for Slow {}
impl Request for Slow {
    type Response = u64;
}

// ============================================================================
// Test Handlers
// ============================================================================

pub struct GreetHandler;

impl RequestHandler<Greet> for GreetHandler {
    type Error = Infallible;

    async fn handle(&self, request: Greet) -> Result<String, Infallible> {
        Ok(format!("Hello, {}", request.name))
    }
}

pub struct ShoutHandler;

impl RequestHandler<Greet> for ShoutHandler {
    type Error = Infallible;

    async fn handle(&self, request: Greet) -> Result<String, Infallible> {
        Ok(format!("HELLO, {}!", request.name.to_uppercase()))
    }
}

/// Shared call counters, keyed by handler.
#[derive(Clone, Default)]
pub struct Calls {
    pub greet: Arc<AtomicUsize>,
    pub record: Arc<AtomicUsize>,
}

impl Calls {
    pub fn greet(&self) -> usize {
        self.greet.load(Ordering::SeqCst)
    }

    pub fn record(&self) -> usize {
        self.record.load(Ordering::SeqCst)
    }
}

pub struct CountingGreetHandler {
    pub calls: Calls,
}

impl RequestHandler<Greet> for CountingGreetHandler {
    type Error = Infallible;

    async fn handle(&self, request: Greet) -> Result<String, Infallible> {
        self.calls.greet.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Hello, {}", request.name))
    }
}

pub struct RecordHandler {
    pub calls: Calls,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl RequestHandler<Record> for RecordHandler {
    type Error = Infallible;

    async fn handle(&self, request: Record) -> Result<(), Infallible> {
        self.calls.record.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(request.entry);
        Ok(())
    }
}

pub struct Ledger {
    pub balance: u64,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BankError {
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: u64, requested: u64 },
}

pub struct WithdrawHandler {
    pub ledger: Arc<Ledger>,
}

impl RequestHandler<Withdraw> for WithdrawHandler {
    type Error = BankError;

    async fn handle(&self, request: Withdraw) -> Result<u64, BankError> {
        if request.amount > self.ledger.balance {
            return Err(BankError::InsufficientFunds {
                balance: self.ledger.balance,
                requested: request.amount,
            });
        }
        Ok(self.ledger.balance - request.amount)
    }
}

/// Sleeps, then reports the id of the scope it was built in.
pub struct SlowHandler {
    pub scope_id: u64,
}

impl RequestHandler<Slow> for SlowHandler {
    type Error = Infallible;

    async fn handle(&self, request: Slow) -> Result<u64, Infallible> {
        tokio::time::sleep(request.delay).await;
        Ok(self.scope_id)
    }
}

/// Reports the id of the scope it was built in.
pub struct ScopeGreetHandler {
    pub scope_id: u64,
}

impl RequestHandler<Greet> for ScopeGreetHandler {
    type Error = Infallible;

    async fn handle(&self, request: Greet) -> Result<String, Infallible> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(format!("{}@{}", request.name, self.scope_id))
    }
}
