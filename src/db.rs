use sqlx::MySqlPool;

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id CHAR(36) PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMP(3) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        user_id CHAR(36) NOT NULL,
        jti CHAR(36) NOT NULL UNIQUE,
        expires_at TIMESTAMP(3) NOT NULL,
        revoked BOOLEAN NOT NULL DEFAULT FALSE,
        INDEX idx_refresh_tokens_user (user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS payslips (
        id CHAR(36) PRIMARY KEY,
        employee_name VARCHAR(255) NOT NULL,
        employee_id VARCHAR(64) NOT NULL,
        salary DOUBLE NOT NULL,
        deductions DOUBLE NOT NULL,
        tax_amount DOUBLE NOT NULL,
        net_pay DOUBLE NOT NULL,
        month VARCHAR(16) NOT NULL,
        year CHAR(4) NOT NULL,
        payment_date DATE NOT NULL,
        created_at TIMESTAMP(3) NOT NULL,
        updated_at TIMESTAMP(3) NOT NULL,
        user_id CHAR(36) NOT NULL,
        INDEX idx_payslips_owner_created (user_id, created_at)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS payslip_files (
        id CHAR(36) PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        url VARCHAR(1024) NOT NULL,
        content_type VARCHAR(255) NOT NULL,
        size BIGINT NOT NULL,
        created_at TIMESTAMP(3) NOT NULL,
        user_id CHAR(36) NOT NULL,
        INDEX idx_payslip_files_owner_created (user_id, created_at)
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Create the tables if they are missing. Existing tables are left as they are.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
