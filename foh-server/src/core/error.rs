use thiserror::Error;

/// 服务器运行错误 (进程边界)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("端口绑定失败: {0}")]
    Bind(std::io::Error),

    #[error("HTTP 服务异常: {0}")]
    Serve(std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
