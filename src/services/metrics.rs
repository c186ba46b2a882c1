use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    pub static ref TIMERS_CREATED_COUNTER: CounterVec = register_counter_vec!(
        "timers_created_total",
        "Timers created per shop",
        &["shop"]
    ).unwrap();

    pub static ref TIMERS_UPDATED_COUNTER: CounterVec = register_counter_vec!(
        "timers_updated_total",
        "Timers updated per shop",
        &["shop"]
    ).unwrap();

    pub static ref TIMERS_DELETED_COUNTER: CounterVec = register_counter_vec!(
        "timers_deleted_total",
        "Delete requests per shop",
        &["shop"]
    ).unwrap();

    // Unauthenticated callers pick the shop, so this one is labelled by outcome only.
    pub static ref PUBLIC_QUERIES_COUNTER: CounterVec = register_counter_vec!(
        "public_timer_queries_total",
        "Storefront widget lookups, by whether any timer was returned",
        &["result"]
    ).unwrap();
}
