//! Initial database migration.
//!
//! Creates the role enum, core tables, indexes, and updated_at triggers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(WORKERS_SQL).await?;
        db.execute_unprepared(DAILY_ENTRIES_SQL).await?;
        db.execute_unprepared(TRUCKS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Worker roles
CREATE TYPE user_role AS ENUM (
    'admin',
    'manager',
    'station_supervisor'
);
";

const WORKERS_SQL: &str = r"
CREATE TABLE workers (
    id UUID PRIMARY KEY,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role user_role NOT NULL,
    branch TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_workers_email ON workers (email);
";

const DAILY_ENTRIES_SQL: &str = r"
CREATE TABLE daily_entries (
    id UUID PRIMARY KEY,
    branch TEXT NOT NULL,
    date TIMESTAMPTZ NOT NULL,
    opening_meter_reading_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    closing_meter_reading_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    opening_meter_reading_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    closing_meter_reading_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    opening_tank_reading_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    closing_tank_reading_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    opening_tank_reading_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    closing_tank_reading_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    pump_test_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    pump_test_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_pump_test NUMERIC(16, 2) NOT NULL DEFAULT 0,
    received_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    received_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_received NUMERIC(16, 2) NOT NULL DEFAULT 0,
    actuals_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    actuals_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_actuals NUMERIC(16, 2) NOT NULL DEFAULT 0,
    sales_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    sales_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_sales NUMERIC(16, 2) NOT NULL DEFAULT 0,
    variation_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    variation_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_variation NUMERIC(16, 2) NOT NULL DEFAULT 0,
    unit_price_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    unit_price_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    sales_in_cedis_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    sales_in_cedis_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_sales_in_cedis NUMERIC(16, 2) NOT NULL DEFAULT 0,
    actuals_in_cedis_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    actuals_in_cedis_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_actuals_in_cedis NUMERIC(16, 2) NOT NULL DEFAULT 0,
    variation_in_cedis_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    variation_in_cedis_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_variation_in_cedis NUMERIC(16, 2) NOT NULL DEFAULT 0,
    credit_ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    credit_pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_credit NUMERIC(16, 2) NOT NULL DEFAULT 0,
    collections_cash NUMERIC(16, 2) NOT NULL DEFAULT 0,
    collections_cheque NUMERIC(16, 2) NOT NULL DEFAULT 0,
    total_collections NUMERIC(16, 2) NOT NULL DEFAULT 0,
    expenditure NUMERIC(16, 2) NOT NULL DEFAULT 0,
    comment TEXT,
    net_sales NUMERIC(16, 2) NOT NULL DEFAULT 0,
    user_id UUID NOT NULL REFERENCES workers(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Serves the latest-prior-entry lookup used by opening-value backfill
CREATE INDEX idx_daily_entries_branch_created_at
    ON daily_entries (branch, created_at DESC);

CREATE INDEX idx_daily_entries_date ON daily_entries (date);
";

const TRUCKS_SQL: &str = r"
CREATE TABLE trucks (
    id UUID PRIMARY KEY,
    branch TEXT NOT NULL,
    ago NUMERIC(16, 2) NOT NULL DEFAULT 0,
    pms NUMERIC(16, 2) NOT NULL DEFAULT 0,
    date TIMESTAMPTZ NOT NULL,
    driver TEXT NOT NULL,
    destination TEXT NOT NULL,
    truck_number TEXT NOT NULL,
    user_id UUID NOT NULL REFERENCES workers(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_trucks_branch ON trucks (branch);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER workers_set_updated_at
    BEFORE UPDATE ON workers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER daily_entries_set_updated_at
    BEFORE UPDATE ON daily_entries
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trucks_set_updated_at
    BEFORE UPDATE ON trucks
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS trucks;
DROP TABLE IF EXISTS daily_entries;
DROP TABLE IF EXISTS workers;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS user_role;
";
