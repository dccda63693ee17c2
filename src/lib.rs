//! Campus Hub - 高校教务管理后端
//!
//! 学生、教师、家长三类账号，覆盖课程、成绩、考勤、CIE 内部评估与统计分析。
//!
//! # 架构
//! - `cache`: 用户缓存（Moka/Redis 插件）
//! - `config`: 分层配置
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误类型
//! - `middlewares`: JWT 认证、角色校验、限流
//! - `models`: 请求/响应与领域模型
//! - `routes`: `/api` 路由
//! - `runtime`: 启动与关闭
//! - `services`: 业务逻辑
//! - `storage`: 存储层（SeaORM）
//! - `utils`: 校验、表格、上传等工具

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
