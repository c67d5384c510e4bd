use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{JwtService, VerificationCodes};
use crate::core::{BackgroundTasks, Config};
use crate::db::DbService;
use crate::db::repository::{
    CustomerRepository, OrderRepository, ProductRepository, ReportRepository, ReviewRepository,
};
use crate::db::seed::ensure_admin;
use crate::inventory::{InventoryLedger, RecordLocks};
use crate::orders::OrderService;
use crate::services::{ImageStore, LocalImageStore, LogMailer, Mailer};
use crate::utils::AppResult;

/// How often expired verification codes are swept
const VERIFICATION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆一次的成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | ledger | InventoryLedger | 库存台账 (按商品加锁) |
/// | orders | OrderService | 订单服务 |
/// | verification_codes | Arc<VerificationCodes> | 待验证的验证码 |
/// | mailer | Arc<dyn Mailer> | 验证码投递 |
/// | images | Arc<dyn ImageStore> | 商品图片存储 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    pub ledger: InventoryLedger,
    pub orders: OrderService,
    pub verification_codes: Arc<VerificationCodes>,
    pub mailer: Arc<dyn Mailer>,
    pub images: Arc<dyn ImageStore>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (work_dir/database 或内存) 并应用 schema
    /// 2. 创建管理员账户 (首次启动)
    /// 3. 组装服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::open(config).await?.db;
        Self::build(config, db, Arc::new(LogMailer)).await
    }

    /// 在已准备好的数据库上组装状态 (测试中传入 `MemoryMailer`)
    pub async fn build(
        config: &Config,
        db: Surreal<Db>,
        mailer: Arc<dyn Mailer>,
    ) -> AppResult<Self> {
        let customers = CustomerRepository::new(db.clone());
        ensure_admin(&customers, &config.admin).await?;

        let ledger = InventoryLedger::new(ProductRepository::new(db.clone()), RecordLocks::new());
        let orders = OrderService::new(
            OrderRepository::new(db.clone()),
            customers,
            ledger.clone(),
            config.orders,
        );

        Ok(Self {
            config: config.clone(),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            ledger,
            orders,
            verification_codes: Arc::new(VerificationCodes::new(Duration::from_secs(
                config.verification_code_ttl_secs,
            ))),
            mailer,
            images: Arc::new(LocalImageStore::new(
                config.images_dir(),
                config.max_image_bytes,
            )),
            db,
        })
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.db.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.db.clone())
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.db.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.db.clone())
    }

    /// 启动后台任务
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let codes = self.verification_codes.clone();
        tasks.spawn_periodic("verification_sweep", VERIFICATION_SWEEP_INTERVAL, move || {
            let codes = codes.clone();
            async move {
                let purged = codes.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Expired verification codes removed");
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}
