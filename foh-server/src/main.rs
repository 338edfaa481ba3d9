use foh_server::{Server, ServerState, periodic_cleanup, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境 (dotenv, 工作目录, 日志) + 配置
    let config = setup_environment()?;

    print_banner();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "FOH server starting...");

    // 2. 日志清理
    tokio::spawn(periodic_cleanup(config.log_dir()));

    // 3. 初始化服务器状态 (数据库、管理员、JWT、消息总线)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
