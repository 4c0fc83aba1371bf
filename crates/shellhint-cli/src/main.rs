use anyhow::anyhow;
use anyhow::Result;
use shellhint_term::application::cli;
use shellhint_term::application::logging;
use shellhint_term::destruct_terminal_for_panic;
use shellhint_term::domain::models::Action;
use shellhint_term::domain::models::BackendName;
use shellhint_term::domain::models::CommandReport;
use shellhint_term::domain::models::Event;
use shellhint_term::start_ui;
use shellhint_term::ActionsService;
use shellhint_term::BackendClientManager;
use shellhint_term::Config;
use shellhint_term::ConfigKey;
use tokio::sync::mpsc;
use tokio::task;

/// Output of commands run from the menu, shown once the terminal is back to
/// normal.
fn print_reports(reports: &[CommandReport]) {
    for report in reports {
        println!("$ {}", report.command);
        print!("{}", report.output);
        if !report.output.is_empty() && !report.output.ends_with('\n') {
            println!();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if !cli::parse()? {
        return Ok(());
    }

    let _log_guard = logging::init()?;
    tracing::info!(
        backend = Config::get(ConfigKey::Backend),
        model = Config::get(ConfigKey::Model),
        ollama_url = Config::get(ConfigKey::OllamaUrl),
        "starting"
    );

    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let backend_name = BackendName::parse(&Config::get(ConfigKey::Backend))
        .ok_or_else(|| anyhow!("Unknown backend {}", Config::get(ConfigKey::Backend)))?;
    let backend = BackendClientManager::get(backend_name)?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures
        .spawn(async move { ActionsService::start(backend, event_tx, &mut action_rx).await });

    let result = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res.map(|_| vec![]),
            Some(Err(err)) => Err(err.into()),
            None => Ok(vec![]),
        },
        res = start_ui(action_tx, event_rx) => res,
    );

    let reports = match result {
        Ok(reports) => reports,
        Err(err) => {
            destruct_terminal_for_panic();
            tracing::error!(error = ?err, "shellhint stopped");
            return Err(err);
        }
    };

    print_reports(&reports);

    return Ok(());
}
