//! Request metadata demo
//!
//! Simulates several overlapping requests against one wrapped handler. Each
//! request sleeps for a different time and logs from nested helpers; every
//! log line carries that request's own `x-request-id`.

use anyhow::Context;
use clap::Parser;
use request_metadata::{
    Metadata, MetadataAccessor, REQUEST_ID_HEADER, RequestContext, RequestMetadataConfig,
    ResponseHeaders, setup, spans, tracing_setup,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{Instrument, info};

type DemoContext = RequestContext<HashMap<String, String>, Arc<ResponseHeaders>>;

#[derive(Parser, Debug)]
#[command(name = "request-metadata-demo")]
#[command(about = "Run overlapping requests through a metadata-scoped handler")]
struct Args {
    /// Number of concurrent requests to simulate
    #[arg(short, long, default_value_t = 3)]
    requests: u64,

    /// Incoming x-request-id for the first request (others get generated ids)
    #[arg(long)]
    request_id: Option<String>,

    /// Delay step in milliseconds; request N sleeps (requests - N) * step
    #[arg(long, default_value_t = 10)]
    step_ms: u64,

    /// Disable scoping (handlers run without metadata)
    #[arg(long)]
    disabled: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_setup::init_tracing();

    let args = Args::parse();
    let mut config = RequestMetadataConfig::from_env().context("loading configuration")?;
    if args.disabled {
        config = config.with_enabled(false);
    }

    let wrapper = setup::<DemoContext>(&config);
    let accessor = wrapper.accessor();
    let handler = Arc::new(wrapper.wrap(move |ctx: DemoContext| {
        let accessor = accessor.clone();
        async move {
            let delay = ctx
                .request
                .get("x-demo-delay-ms")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0);
            let span = spans::request(&accessor, "/api/hello");
            let some_prop = async {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                calculate_some_prop(&accessor, "API handler")
            }
            .instrument(span)
            .await;
            (some_prop, ctx.response.get(REQUEST_ID_HEADER))
        }
    }));

    let mut tasks = JoinSet::new();
    for index in 0..args.requests {
        let mut request = HashMap::from([(
            "x-demo-delay-ms".to_string(),
            request_delay_ms(args.requests, index, args.step_ms).to_string(),
        )]);
        if index == 0 {
            if let Some(id) = &args.request_id {
                request.insert(REQUEST_ID_HEADER.to_string(), id.clone());
            }
        }
        let ctx = RequestContext::new(request, Arc::new(ResponseHeaders::new()));
        tasks.spawn(handler.call_async(ctx)?);
    }

    while let Some(joined) = tasks.join_next().await {
        let (some_prop, response_id) = joined.context("request task panicked")?;
        info!(
            response_id = response_id.as_deref().unwrap_or("none"),
            some_prop = %some_prop,
            "Request completed"
        );
    }

    Ok(())
}

fn calculate_some_prop(accessor: &MetadataAccessor<Metadata>, id: &str) -> String {
    let _guard = spans::handler(accessor, "calculate_some_prop").entered();
    info!("Calculating someProp for ID: {id}");
    format!(
        "someValue for ID {id}. Nested function returned: {}",
        nested_function(accessor)
    )
}

fn nested_function(accessor: &MetadataAccessor<Metadata>) -> u32 {
    let _guard = spans::handler(accessor, "nested_function").entered();
    info!("This is a log from a nested function.");
    123
}

/// Delay for request `index`; earlier requests sleep longer so they finish last.
fn request_delay_ms(requests: u64, index: u64, step_ms: u64) -> u64 {
    requests.saturating_sub(index).saturating_mul(step_ms)
}
