use env_logger::Env;

/// 初始化日誌，預設只顯示警告；`RUST_LOG` 可覆寫
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    // 測試或重複呼叫時 logger 可能已初始化
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .try_init();
}
