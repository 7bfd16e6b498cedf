//! 数据库查询操作

use crate::connection::DatabasePool;
use crate::models::*;
use crate::seed::{compliance_seed, sample_patients};
use crate::store::ComplianceStore;
use async_trait::async_trait;
use rso_core::models::*;
use rso_core::{Result, RsoError};
use sqlx::{PgExecutor, Row};
use tracing::{debug, info};

// 查询列清单。NUMERIC 列显式转为 float8 以便按 f64 解码。

const PATIENT_COLUMNS: &str = "id, patient_name, patient_id, scan_type, duration, insurance, \
     appointment_status, appointment_date, created_at";

const DAILY_SURVEY_COLUMNS: &str = "id, survey_date, technologist, area, \
     radiation_reading::float8 AS radiation_reading, actions, status, created_at";

const WEEKLY_SURVEY_COLUMNS: &str = "id, week_ending, technologist, areas, \
     max_reading::float8 AS max_reading, avg_reading::float8 AS avg_reading, \
     comments, status, created_at";

const SEALED_SOURCE_COLUMNS: &str = "id, inventory_date, source_id, isotope, \
     activity::float8 AS activity, location, condition, comments, created_at";

const TRACER_CHECKOUT_COLUMNS: &str = "id, checkout_date, tracer_type, technologist, \
     check_out_time, check_in_time, patient_id, status, created_at";

const DOSE_PATIENT_COLUMNS: &str = "id, patient_id, patient_name, \
     dose_ordered::float8 AS dose_ordered, dose_delivered::float8 AS dose_delivered, \
     scan_date, cancellation, credit_due::float8 AS credit_due, created_at";

const QC_COLUMNS: &str = "id, qc_date, calibrator_id, technologist, test_type, result, \
     comments, created_at";

const DOSIMETER_COLUMNS: &str = "id, tracking_date, employee_name, badge_id, \
     exposure::float8 AS exposure, monthly_total::float8 AS monthly_total, \
     quarterly_total::float8 AS quarterly_total, yearly_total::float8 AS yearly_total, \
     status, created_at";

/// 七张合规表，按清空顺序排列
const COMPLIANCE_TABLES: [&str; 7] = [
    "daily_area_surveys",
    "weekly_area_surveys",
    "sealed_source_inventory",
    "tracer_checkout",
    "dose_patient_info",
    "qc_calibrator",
    "dosimeter_tracker",
];

/// 数据库查询操作接口
pub struct DatabaseQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> DatabaseQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 创建数据库表
    pub async fn create_tables(&self) -> Result<()> {
        let pool = self.pool.pool();

        let tables = [
            // 预约患者
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                id SERIAL PRIMARY KEY,
                patient_name VARCHAR(255) NOT NULL,
                patient_id VARCHAR(100) UNIQUE NOT NULL,
                scan_type VARCHAR(100) NOT NULL,
                duration INTEGER NOT NULL,
                insurance VARCHAR(100) NOT NULL,
                appointment_status VARCHAR(50) NOT NULL,
                appointment_date TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            // 剂量订单（预留，接口暂不写入）
            r#"
            CREATE TABLE IF NOT EXISTS dose_orders (
                id SERIAL PRIMARY KEY,
                patient_id VARCHAR(100) REFERENCES patients(patient_id),
                dose_type VARCHAR(50) NOT NULL,
                vendor VARCHAR(100) NOT NULL,
                order_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                status VARCHAR(50) DEFAULT 'Ordered'
            )
            "#,
            // 剂量退款（预留）
            r#"
            CREATE TABLE IF NOT EXISTS dose_credits (
                id SERIAL PRIMARY KEY,
                patient_id VARCHAR(100) REFERENCES patients(patient_id),
                order_id INTEGER REFERENCES dose_orders(id),
                credit_amount NUMERIC(10, 2),
                reason VARCHAR(255),
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS daily_area_surveys (
                id SERIAL PRIMARY KEY,
                survey_date DATE NOT NULL,
                technologist VARCHAR(255) NOT NULL,
                area VARCHAR(255) NOT NULL,
                radiation_reading NUMERIC(10, 2) NOT NULL,
                actions TEXT,
                status VARCHAR(50) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS weekly_area_surveys (
                id SERIAL PRIMARY KEY,
                week_ending DATE NOT NULL,
                technologist VARCHAR(255) NOT NULL,
                areas TEXT NOT NULL,
                max_reading NUMERIC(10, 2) NOT NULL,
                avg_reading NUMERIC(10, 2) NOT NULL,
                comments TEXT,
                status VARCHAR(50) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS sealed_source_inventory (
                id SERIAL PRIMARY KEY,
                inventory_date DATE NOT NULL,
                source_id VARCHAR(100) NOT NULL,
                isotope VARCHAR(100) NOT NULL,
                activity NUMERIC(10, 2) NOT NULL,
                location VARCHAR(255) NOT NULL,
                condition VARCHAR(100) NOT NULL,
                comments TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS tracer_checkout (
                id SERIAL PRIMARY KEY,
                checkout_date DATE NOT NULL,
                tracer_type VARCHAR(100) NOT NULL,
                technologist VARCHAR(255) NOT NULL,
                check_in_time TIME,
                check_out_time TIME,
                patient_id VARCHAR(100),
                status VARCHAR(50) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS dose_patient_info (
                id SERIAL PRIMARY KEY,
                patient_id VARCHAR(100) NOT NULL,
                patient_name VARCHAR(255) NOT NULL,
                dose_ordered NUMERIC(10, 2) NOT NULL,
                dose_delivered NUMERIC(10, 2),
                scan_date DATE NOT NULL,
                cancellation BOOLEAN NOT NULL DEFAULT FALSE,
                credit_due NUMERIC(10, 2),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS qc_calibrator (
                id SERIAL PRIMARY KEY,
                qc_date DATE NOT NULL,
                calibrator_id VARCHAR(100) NOT NULL,
                technologist VARCHAR(255) NOT NULL,
                test_type VARCHAR(100) NOT NULL,
                result VARCHAR(100) NOT NULL,
                comments TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS dosimeter_tracker (
                id SERIAL PRIMARY KEY,
                tracking_date DATE NOT NULL,
                employee_name VARCHAR(255) NOT NULL,
                badge_id VARCHAR(100) NOT NULL,
                exposure NUMERIC(10, 2) NOT NULL,
                monthly_total NUMERIC(10, 2),
                quarterly_total NUMERIC(10, 2),
                yearly_total NUMERIC(10, 2),
                status VARCHAR(50) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        ];

        for table_sql in tables {
            sqlx::query(table_sql).execute(pool).await?;
        }

        // 创建索引以优化列表排序
        self.create_indexes().await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// 创建数据库索引
    async fn create_indexes(&self) -> Result<()> {
        let pool = self.pool.pool();

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_patients_appointment_date ON patients(appointment_date)",
            "CREATE INDEX IF NOT EXISTS idx_daily_area_surveys_date ON daily_area_surveys(survey_date)",
            "CREATE INDEX IF NOT EXISTS idx_weekly_area_surveys_week ON weekly_area_surveys(week_ending)",
            "CREATE INDEX IF NOT EXISTS idx_sealed_source_inventory_date ON sealed_source_inventory(inventory_date)",
            "CREATE INDEX IF NOT EXISTS idx_tracer_checkout_date ON tracer_checkout(checkout_date)",
            "CREATE INDEX IF NOT EXISTS idx_dose_patient_info_scan_date ON dose_patient_info(scan_date)",
            "CREATE INDEX IF NOT EXISTS idx_qc_calibrator_date ON qc_calibrator(qc_date)",
            "CREATE INDEX IF NOT EXISTS idx_dosimeter_tracker_date ON dosimeter_tracker(tracking_date)",
        ];

        for index_sql in indexes {
            sqlx::query(index_sql).execute(pool).await?;
        }

        debug!("Database indexes created successfully");
        Ok(())
    }

    /// 统计患者数量
    pub async fn count_patients(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM patients")
            .fetch_one(self.pool.pool())
            .await?;
        Ok(row.try_get("count")?)
    }

    // ========== 患者相关操作 ==========

    pub async fn create_patient(&self, patient: &NewPatient) -> Result<Patient> {
        insert_patient(self.pool.pool(), patient).await
    }

    /// 预约时间升序，无时间的排在最后
    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        let sql = format!(
            "SELECT {} FROM patients ORDER BY appointment_date ASC NULLS LAST, id ASC",
            PATIENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbPatient>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ========== 合规记录相关操作 ==========

    pub async fn create_daily_survey(&self, survey: &NewDailyAreaSurvey) -> Result<DailyAreaSurvey> {
        insert_daily_survey(self.pool.pool(), survey).await
    }

    pub async fn list_daily_surveys(&self) -> Result<Vec<DailyAreaSurvey>> {
        let sql = format!(
            "SELECT {} FROM daily_area_surveys ORDER BY survey_date DESC, id DESC",
            DAILY_SURVEY_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbDailyAreaSurvey>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_weekly_survey(&self, survey: &NewWeeklyAreaSurvey) -> Result<WeeklyAreaSurvey> {
        insert_weekly_survey(self.pool.pool(), survey).await
    }

    pub async fn list_weekly_surveys(&self) -> Result<Vec<WeeklyAreaSurvey>> {
        let sql = format!(
            "SELECT {} FROM weekly_area_surveys ORDER BY week_ending DESC, id DESC",
            WEEKLY_SURVEY_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbWeeklyAreaSurvey>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_sealed_source(&self, source: &NewSealedSource) -> Result<SealedSource> {
        insert_sealed_source(self.pool.pool(), source).await
    }

    pub async fn list_sealed_sources(&self) -> Result<Vec<SealedSource>> {
        let sql = format!(
            "SELECT {} FROM sealed_source_inventory ORDER BY inventory_date DESC, id DESC",
            SEALED_SOURCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbSealedSource>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_tracer_checkout(&self, checkout: &NewTracerCheckout) -> Result<TracerCheckout> {
        insert_tracer_checkout(self.pool.pool(), checkout).await
    }

    pub async fn list_tracer_checkouts(&self) -> Result<Vec<TracerCheckout>> {
        let sql = format!(
            "SELECT {} FROM tracer_checkout ORDER BY checkout_date DESC, id DESC",
            TRACER_CHECKOUT_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbTracerCheckout>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_dose_patient_info(&self, record: &NewDosePatientInfo) -> Result<DosePatientInfo> {
        insert_dose_patient_info(self.pool.pool(), record).await
    }

    pub async fn list_dose_patient_info(&self) -> Result<Vec<DosePatientInfo>> {
        let sql = format!(
            "SELECT {} FROM dose_patient_info ORDER BY scan_date DESC, id DESC",
            DOSE_PATIENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbDosePatientInfo>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_qc_record(&self, record: &NewQcCalibratorRecord) -> Result<QcCalibratorRecord> {
        insert_qc_record(self.pool.pool(), record).await
    }

    pub async fn list_qc_records(&self) -> Result<Vec<QcCalibratorRecord>> {
        let sql = format!(
            "SELECT {} FROM qc_calibrator ORDER BY qc_date DESC, id DESC",
            QC_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbQcCalibratorRecord>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create_dosimeter_record(&self, record: &NewDosimeterRecord) -> Result<DosimeterRecord> {
        insert_dosimeter_record(self.pool.pool(), record).await
    }

    pub async fn list_dosimeter_records(&self) -> Result<Vec<DosimeterRecord>> {
        let sql = format!(
            "SELECT {} FROM dosimeter_tracker ORDER BY tracking_date DESC, id DESC",
            DOSIMETER_COLUMNS
        );
        let rows = sqlx::query_as::<_, DbDosimeterRecord>(&sql)
            .fetch_all(self.pool.pool())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    // ========== 种子数据 ==========

    /// 在一个事务内清空患者表并写入示例患者
    pub async fn reseed_patients(&self) -> Result<SeedCounts> {
        let patients = sample_patients();
        let mut tx = self.pool.pool().begin().await?;

        // 预留表引用 patients(patient_id)，需先清空
        for table in ["dose_credits", "dose_orders", "patients"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
        }
        for patient in &patients {
            insert_patient(&mut *tx, patient).await?;
        }
        tx.commit().await?;

        info!("Reseeded {} sample patients", patients.len());
        Ok(SeedCounts {
            patients: patients.len(),
            ..SeedCounts::default()
        })
    }

    /// 在一个事务内清空七张合规表并写入示例数据
    pub async fn reseed_compliance(&self) -> Result<SeedCounts> {
        let seed = compliance_seed();
        let mut tx = self.pool.pool().begin().await?;

        for table in COMPLIANCE_TABLES {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
        }

        for survey in &seed.daily_surveys {
            insert_daily_survey(&mut *tx, survey).await?;
        }
        for survey in &seed.weekly_surveys {
            insert_weekly_survey(&mut *tx, survey).await?;
        }
        for source in &seed.sealed_sources {
            insert_sealed_source(&mut *tx, source).await?;
        }
        for checkout in &seed.tracer_checkouts {
            insert_tracer_checkout(&mut *tx, checkout).await?;
        }
        for record in &seed.dose_patient_records {
            insert_dose_patient_info(&mut *tx, record).await?;
        }
        for record in &seed.qc_records {
            insert_qc_record(&mut *tx, record).await?;
        }
        for record in &seed.dosimeter_records {
            insert_dosimeter_record(&mut *tx, record).await?;
        }
        tx.commit().await?;

        let counts = seed.counts();
        info!("Reseeded compliance tables: {:?}", counts);
        Ok(counts)
    }
}

// ========== 单行插入 ==========
// 既可作用于连接池，也可作用于事务。

async fn insert_patient<'e, E: PgExecutor<'e>>(executor: E, patient: &NewPatient) -> Result<Patient> {
    let sql = format!(
        "INSERT INTO patients (patient_name, patient_id, scan_type, duration, insurance, \
         appointment_status, appointment_date) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        PATIENT_COLUMNS
    );
    let row = sqlx::query_as::<_, DbPatient>(&sql)
        .bind(&patient.patient_name)
        .bind(&patient.patient_id)
        .bind(&patient.scan_type)
        .bind(patient.duration)
        .bind(&patient.insurance)
        .bind(patient.appointment_status.as_str())
        .bind(patient.appointment_date)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_daily_survey<'e, E: PgExecutor<'e>>(
    executor: E,
    survey: &NewDailyAreaSurvey,
) -> Result<DailyAreaSurvey> {
    let sql = format!(
        "INSERT INTO daily_area_surveys (survey_date, technologist, area, radiation_reading, \
         actions, status) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        DAILY_SURVEY_COLUMNS
    );
    let row = sqlx::query_as::<_, DbDailyAreaSurvey>(&sql)
        .bind(survey.survey_date)
        .bind(&survey.technologist)
        .bind(&survey.area)
        .bind(survey.radiation_reading)
        .bind(&survey.actions)
        .bind(&survey.status)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_weekly_survey<'e, E: PgExecutor<'e>>(
    executor: E,
    survey: &NewWeeklyAreaSurvey,
) -> Result<WeeklyAreaSurvey> {
    let sql = format!(
        "INSERT INTO weekly_area_surveys (week_ending, technologist, areas, max_reading, \
         avg_reading, comments, status) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        WEEKLY_SURVEY_COLUMNS
    );
    let row = sqlx::query_as::<_, DbWeeklyAreaSurvey>(&sql)
        .bind(survey.week_ending)
        .bind(&survey.technologist)
        .bind(&survey.areas)
        .bind(survey.max_reading)
        .bind(survey.avg_reading)
        .bind(&survey.comments)
        .bind(&survey.status)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_sealed_source<'e, E: PgExecutor<'e>>(
    executor: E,
    source: &NewSealedSource,
) -> Result<SealedSource> {
    let sql = format!(
        "INSERT INTO sealed_source_inventory (inventory_date, source_id, isotope, activity, \
         location, condition, comments) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        SEALED_SOURCE_COLUMNS
    );
    let row = sqlx::query_as::<_, DbSealedSource>(&sql)
        .bind(source.inventory_date)
        .bind(&source.source_id)
        .bind(&source.isotope)
        .bind(source.activity)
        .bind(&source.location)
        .bind(source.condition.as_str())
        .bind(&source.comments)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_tracer_checkout<'e, E: PgExecutor<'e>>(
    executor: E,
    checkout: &NewTracerCheckout,
) -> Result<TracerCheckout> {
    let sql = format!(
        "INSERT INTO tracer_checkout (checkout_date, tracer_type, technologist, check_out_time, \
         check_in_time, patient_id, status) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        TRACER_CHECKOUT_COLUMNS
    );
    let row = sqlx::query_as::<_, DbTracerCheckout>(&sql)
        .bind(checkout.checkout_date)
        .bind(&checkout.tracer_type)
        .bind(&checkout.technologist)
        .bind(checkout.check_out_time)
        .bind(checkout.check_in_time)
        .bind(&checkout.patient_id)
        .bind(&checkout.status)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_dose_patient_info<'e, E: PgExecutor<'e>>(
    executor: E,
    record: &NewDosePatientInfo,
) -> Result<DosePatientInfo> {
    let sql = format!(
        "INSERT INTO dose_patient_info (patient_id, patient_name, dose_ordered, dose_delivered, \
         scan_date, cancellation, credit_due) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
        DOSE_PATIENT_COLUMNS
    );
    let row = sqlx::query_as::<_, DbDosePatientInfo>(&sql)
        .bind(&record.patient_id)
        .bind(&record.patient_name)
        .bind(record.dose_ordered)
        .bind(record.dose_delivered)
        .bind(record.scan_date)
        .bind(record.cancellation)
        .bind(record.credit_due)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_qc_record<'e, E: PgExecutor<'e>>(
    executor: E,
    record: &NewQcCalibratorRecord,
) -> Result<QcCalibratorRecord> {
    let sql = format!(
        "INSERT INTO qc_calibrator (qc_date, calibrator_id, technologist, test_type, result, \
         comments) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        QC_COLUMNS
    );
    let row = sqlx::query_as::<_, DbQcCalibratorRecord>(&sql)
        .bind(record.qc_date)
        .bind(&record.calibrator_id)
        .bind(&record.technologist)
        .bind(&record.test_type)
        .bind(record.result.as_str())
        .bind(&record.comments)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

async fn insert_dosimeter_record<'e, E: PgExecutor<'e>>(
    executor: E,
    record: &NewDosimeterRecord,
) -> Result<DosimeterRecord> {
    let sql = format!(
        "INSERT INTO dosimeter_tracker (tracking_date, employee_name, badge_id, exposure, \
         monthly_total, quarterly_total, yearly_total, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
        DOSIMETER_COLUMNS
    );
    let row = sqlx::query_as::<_, DbDosimeterRecord>(&sql)
        .bind(record.tracking_date)
        .bind(&record.employee_name)
        .bind(&record.badge_id)
        .bind(record.exposure)
        .bind(record.monthly_total)
        .bind(record.quarterly_total)
        .bind(record.yearly_total)
        .bind(&record.status)
        .fetch_one(executor)
        .await?;
    Ok(row.into())
}

/// PostgreSQL 存储实现
#[derive(Debug, Clone)]
pub struct PgComplianceStore {
    pool: DatabasePool,
}

impl PgComplianceStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    fn queries(&self) -> DatabaseQueries<'_> {
        DatabaseQueries::new(&self.pool)
    }
}

#[async_trait]
impl ComplianceStore for PgComplianceStore {
    async fn initialize(&self) -> Result<SeedCounts> {
        let queries = self.queries();
        queries.create_tables().await?;

        if queries.count_patients().await? > 0 {
            info!("Patients table already populated, skipping sample data");
            return Ok(SeedCounts::default());
        }
        queries.reseed_patients().await
    }

    async fn reseed_patients(&self) -> Result<SeedCounts> {
        self.queries().reseed_patients().await
    }

    async fn reseed_compliance(&self) -> Result<SeedCounts> {
        self.queries().reseed_compliance().await
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool.pool())
            .await
            .map_err(|e| RsoError::Database(format!("health check failed: {}", e)))?;
        Ok(())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        self.queries().list_patients().await
    }

    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient> {
        self.queries().create_patient(patient).await
    }

    async fn list_daily_surveys(&self) -> Result<Vec<DailyAreaSurvey>> {
        self.queries().list_daily_surveys().await
    }

    async fn create_daily_survey(&self, survey: &NewDailyAreaSurvey) -> Result<DailyAreaSurvey> {
        self.queries().create_daily_survey(survey).await
    }

    async fn list_weekly_surveys(&self) -> Result<Vec<WeeklyAreaSurvey>> {
        self.queries().list_weekly_surveys().await
    }

    async fn create_weekly_survey(&self, survey: &NewWeeklyAreaSurvey) -> Result<WeeklyAreaSurvey> {
        self.queries().create_weekly_survey(survey).await
    }

    async fn list_sealed_sources(&self) -> Result<Vec<SealedSource>> {
        self.queries().list_sealed_sources().await
    }

    async fn create_sealed_source(&self, source: &NewSealedSource) -> Result<SealedSource> {
        self.queries().create_sealed_source(source).await
    }

    async fn list_tracer_checkouts(&self) -> Result<Vec<TracerCheckout>> {
        self.queries().list_tracer_checkouts().await
    }

    async fn create_tracer_checkout(&self, checkout: &NewTracerCheckout) -> Result<TracerCheckout> {
        self.queries().create_tracer_checkout(checkout).await
    }

    async fn list_dose_patient_info(&self) -> Result<Vec<DosePatientInfo>> {
        self.queries().list_dose_patient_info().await
    }

    async fn create_dose_patient_info(&self, record: &NewDosePatientInfo) -> Result<DosePatientInfo> {
        self.queries().create_dose_patient_info(record).await
    }

    async fn list_qc_records(&self) -> Result<Vec<QcCalibratorRecord>> {
        self.queries().list_qc_records().await
    }

    async fn create_qc_record(&self, record: &NewQcCalibratorRecord) -> Result<QcCalibratorRecord> {
        self.queries().create_qc_record(record).await
    }

    async fn list_dosimeter_records(&self) -> Result<Vec<DosimeterRecord>> {
        self.queries().list_dosimeter_records().await
    }

    async fn create_dosimeter_record(&self, record: &NewDosimeterRecord) -> Result<DosimeterRecord> {
        self.queries().create_dosimeter_record(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::PoolSettings;
    use crate::store::{compliance_snapshot, patient_snapshot};
    use rso_core::error::DUPLICATE_PATIENT_ID;
    use chrono::NaiveDate;

    // 需要可用的 PostgreSQL：RSO_TEST_DATABASE_URL=postgres://... cargo test -- --ignored
    async fn test_store() -> PgComplianceStore {
        let url = std::env::var("RSO_TEST_DATABASE_URL")
            .expect("RSO_TEST_DATABASE_URL must be set for database tests");
        let pool = DatabasePool::connect(&PoolSettings::new(url)).await.unwrap();
        let store = PgComplianceStore::new(pool);
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    #[ignore]
    async fn test_daily_survey_round_trip() {
        let store = test_store().await;
        let created = store
            .create_daily_survey(&NewDailyAreaSurvey {
                survey_date: NaiveDate::from_ymd_opt(2030, 1, 2).unwrap(),
                technologist: "Round Trip".to_string(),
                area: "Hot Lab".to_string(),
                radiation_reading: 0.3,
                actions: None,
                status: "Pass".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.radiation_reading, 0.3);
        let listed = store.list_daily_surveys().await.unwrap();
        let found = listed.iter().find(|s| s.id == created.id).unwrap();
        assert_eq!(found.technologist, "Round Trip");
        assert_eq!(found.actions, None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_reseed_is_idempotent() {
        let store = test_store().await;
        let first = store.reseed_compliance().await.unwrap();
        let first_rows = compliance_snapshot(&store).await;
        let second = store.reseed_compliance().await.unwrap();
        let second_rows = compliance_snapshot(&store).await;

        assert_eq!(first, second);
        assert_eq!(first_rows, second_rows);
        assert_eq!(first_rows.0.len(), 10);
        assert_eq!(first_rows.6.len(), 7);

        store.reseed_patients().await.unwrap();
        let first_patients = patient_snapshot(&store).await;
        store.reseed_patients().await.unwrap();
        assert_eq!(first_patients.len(), 30);
        assert_eq!(first_patients, patient_snapshot(&store).await);
    }

    #[tokio::test]
    #[ignore]
    async fn test_duplicate_patient_id_conflicts() {
        let store = test_store().await;
        store.reseed_patients().await.unwrap();
        let duplicate = sample_patients().remove(0);
        let err = store.create_patient(&duplicate).await.unwrap_err();
        assert!(matches!(&err, RsoError::Conflict(message) if message == DUPLICATE_PATIENT_ID));
    }
}
