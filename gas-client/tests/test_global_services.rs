use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use gas_client::{GasError, GasServices, Settings, SettingsProvider};

struct CountingProvider {
    loads: AtomicUsize,
    fail_first: bool,
}

impl SettingsProvider for CountingProvider {
    fn load(&self) -> gas_client::Result<Settings> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_first && attempt == 0 {
            return Err(GasError::Configuration("GAS_DEPLOY_ID not set".to_string()));
        }
        Ok(Settings::new("deploy", "token", "sheet-id")
            .with_endpoint("http://127.0.0.1:9/exec")
            .with_default_sheet("Global"))
    }
}

// One test per binary: the global instance lives for the whole process.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_global_initializes_once_under_concurrent_access() -> Result<()> {
    let provider = Arc::new(CountingProvider {
        loads: AtomicUsize::new(0),
        fail_first: true,
    });

    let failed = GasServices::global_with(provider.as_ref()).await;
    assert!(matches!(failed, Err(GasError::Configuration(_))));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move {
                let services = GasServices::global_with(provider.as_ref()).await?;
                Ok::<_, GasError>(services as *const GasServices as usize)
            })
        })
        .collect();

    let mut addresses = Vec::new();
    for result in futures::future::join_all(handles).await {
        addresses.push(result??);
    }

    addresses.dedup();
    assert_eq!(addresses.len(), 1, "all callers must see the same instance");
    assert_eq!(provider.loads.load(Ordering::SeqCst), 2);

    let services = GasServices::global_with(provider.as_ref()).await?;
    assert_eq!(services.settings().default_sheet.as_deref(), Some("Global"));
    assert_eq!(provider.loads.load(Ordering::SeqCst), 2);

    Ok(())
}
