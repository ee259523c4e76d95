//! `llhook-monitor`: installs low-level keyboard and mouse hooks, logs every
//! event, and applies the suppression rules from the config file until
//! Ctrl-C.
//!
//! ```text
//! main()
//!  └─ load_config()           -- %APPDATA%\llhook\config.toml or defaults
//!  └─ tracing init            -- config log_level, RUST_LOG wins
//!  └─ run()
//!       ├─ KeyboardHook / MouseHook installed on this thread
//!       ├─ ctrl-c watcher     (helper thread, tokio current-thread runtime)
//!       └─ message loop       (until WM_QUIT)
//! ```

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use llhook::infrastructure::storage::config::{self, AppConfig};

fn main() -> anyhow::Result<()> {
    let (cfg, load_error) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.monitor.log_level)),
        )
        .init();

    if let Some(e) = load_error {
        error!("failed to load config, using defaults: {e}");
    }

    info!("llhook-monitor starting");
    run(&cfg)?;
    info!("llhook-monitor stopped");
    Ok(())
}

#[cfg(target_os = "windows")]
fn run(cfg: &AppConfig) -> anyhow::Result<()> {
    use std::rc::Rc;

    use tracing::{debug, warn};

    use llhook::application::monitor::{attach_keyboard, attach_mouse};
    use llhook::infrastructure::os_hooks::windows::{
        current_thread_id, post_quit, run_message_loop,
    };
    use llhook::infrastructure::os_hooks::NativeHookApi;
    use llhook::infrastructure::window::{DeviceContext, NativeWindowQuery, WindowQuery};
    use llhook::HookController;

    if !cfg.monitor.keyboard && !cfg.monitor.mouse {
        anyhow::bail!("both keyboard and mouse hooks are disabled in the config");
    }

    let windows = NativeWindowQuery::new();
    let desktop = windows.desktop_window();
    match windows.window_rect(desktop) {
        Ok(rect) => info!(width = rect.width(), height = rect.height(), "desktop"),
        Err(e) => warn!("could not read desktop geometry: {e}"),
    }
    match DeviceContext::acquire(&windows, desktop) {
        Ok(dc) => debug!(dc = dc.handle().0, "desktop device context available"),
        Err(e) => warn!("desktop device context unavailable: {e}"),
    }

    let api = Rc::new(NativeHookApi::new());
    let rules = cfg.policy.to_rules();

    let keyboard = HookController::keyboard(Rc::clone(&api));
    let mouse = HookController::mouse(Rc::clone(&api));

    if cfg.monitor.keyboard {
        attach_keyboard(&keyboard, rules.clone());
        keyboard.install()?;
    }
    if cfg.monitor.mouse {
        attach_mouse(&mouse, rules);
        mouse.install()?;
    }

    let hook_thread = current_thread_id();
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("failed to start signal runtime: {e}");
                return;
            }
        };
        if let Err(e) = runtime.block_on(tokio::signal::ctrl_c()) {
            error!("failed to wait for Ctrl-C: {e}");
            return;
        }
        info!("shutdown signal received");
        if let Err(e) = post_quit(hook_thread) {
            error!("{e}");
        }
    });

    info!("hooks active. Press Ctrl-C to exit.");
    let result = run_message_loop();

    if mouse.is_installed() {
        mouse.uninstall();
    }
    if keyboard.is_installed() {
        keyboard.uninstall();
    }
    result?;
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn run(_cfg: &AppConfig) -> anyhow::Result<()> {
    error!("low-level hooks are only available on Windows");
    anyhow::bail!("unsupported platform")
}
