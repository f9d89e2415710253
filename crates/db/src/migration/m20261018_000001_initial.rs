//! Initial database migration.
//!
//! Creates the enums, tables, indexes and the `updated_at` trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS & HELPERS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(UPDATED_AT_FN_SQL).await?;

        // ============================================================
        // PART 2: MASTER DATA
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BRANCHES_SQL).await?;
        db.execute_unprepared(VEHICLES_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 3: TRIPS
        // ============================================================
        db.execute_unprepared(TRIPS_SQL).await?;
        db.execute_unprepared(PURCHASES_SQL).await?;

        // ============================================================
        // PART 4: PURCHASE & SALE LEDGERS
        // ============================================================
        db.execute_unprepared(PURCHASE_SALES_SQL).await?;
        db.execute_unprepared(PURCHASE_SALE_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 5: EXPENSES
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE expense_type AS ENUM ('investment', 'revenue', 'other');
CREATE TYPE trip_status AS ENUM ('ongoing', 'completed');
CREATE TYPE ledger_status AS ENUM ('active', 'completed');
CREATE TYPE ledger_transaction_kind AS ENUM ('purchase', 'sale', 'expense');
";

const UPDATED_AT_FN_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(64) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const BRANCHES_SQL: &str = r"
CREATE TABLE branches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    location VARCHAR(255),
    phone VARCHAR(32),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const VEHICLES_SQL: &str = r"
CREATE TABLE vehicles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    vehicle_number VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    vehicle_type VARCHAR(64),
    branch_id UUID REFERENCES branches(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_vehicles_branch ON vehicles(branch_id);
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRIPS_SQL: &str = r"
CREATE TABLE trips (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE RESTRICT,
    title VARCHAR(255) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE,
    status trip_status NOT NULL DEFAULT 'ongoing',
    notes TEXT,
    total_purchase_quantity NUMERIC(20, 4) NOT NULL DEFAULT 0,
    total_purchase_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    total_sale_quantity NUMERIC(20, 4) NOT NULL DEFAULT 0,
    total_sale_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    total_expense_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    profit_loss NUMERIC(20, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_trip_dates CHECK (end_date IS NULL OR end_date >= start_date)
);

CREATE INDEX idx_trips_vehicle ON trips(vehicle_id, start_date DESC);
CREATE INDEX idx_trips_status ON trips(status);
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    trip_id UUID NOT NULL REFERENCES trips(id) ON DELETE CASCADE,
    purchase_date DATE NOT NULL,
    supplier VARCHAR(255),
    quantity NUMERIC(20, 4) NOT NULL,
    rate NUMERIC(20, 4) NOT NULL,
    amount NUMERIC(20, 4) NOT NULL,
    customer VARCHAR(255),
    sale_quantity NUMERIC(20, 4) NOT NULL DEFAULT 0,
    sale_rate NUMERIC(20, 4) NOT NULL DEFAULT 0,
    sale_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_quantity CHECK (quantity > 0),
    CONSTRAINT chk_purchase_rates CHECK (rate >= 0 AND sale_rate >= 0),
    CONSTRAINT chk_purchase_sale_quantity CHECK (sale_quantity >= 0 AND sale_quantity <= quantity)
);

CREATE INDEX idx_purchases_trip ON purchases(trip_id, purchase_date);
";

const PURCHASE_SALES_SQL: &str = r"
CREATE TABLE purchase_sales (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE RESTRICT,
    title VARCHAR(255) NOT NULL,
    start_date DATE NOT NULL,
    opening_balance NUMERIC(20, 4) NOT NULL DEFAULT 0,
    current_balance NUMERIC(20, 4) NOT NULL DEFAULT 0,
    current_tins BIGINT NOT NULL DEFAULT 0,
    status ledger_status NOT NULL DEFAULT 'active',
    completed_at TIMESTAMPTZ,
    completion_expense_id UUID,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_ledger_opening CHECK (opening_balance >= 0),
    CONSTRAINT chk_ledger_balance CHECK (current_balance >= 0),
    CONSTRAINT chk_ledger_tins CHECK (current_tins >= 0)
);

CREATE INDEX idx_purchase_sales_vehicle ON purchase_sales(vehicle_id, start_date DESC);
";

const PURCHASE_SALE_TRANSACTIONS_SQL: &str = r"
CREATE TABLE purchase_sale_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    purchase_sale_id UUID NOT NULL REFERENCES purchase_sales(id) ON DELETE CASCADE,
    kind ledger_transaction_kind NOT NULL,
    amount NUMERIC(20, 4) NOT NULL,
    tins BIGINT NOT NULL DEFAULT 0,
    rate NUMERIC(20, 4),
    description TEXT,
    transaction_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_ledger_txn_amount CHECK (amount > 0),
    CONSTRAINT chk_ledger_txn_tins CHECK (tins >= 0),
    CONSTRAINT chk_ledger_txn_expense_tins CHECK (kind <> 'expense' OR tins = 0)
);

CREATE INDEX idx_ledger_txns_ledger ON purchase_sale_transactions(purchase_sale_id, transaction_date, created_at);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(255) NOT NULL,
    amount NUMERIC(20, 4) NOT NULL,
    expense_type expense_type NOT NULL,
    category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
    vehicle_id UUID REFERENCES vehicles(id) ON DELETE SET NULL,
    trip_id UUID REFERENCES trips(id) ON DELETE SET NULL,
    purchase_sale_id UUID REFERENCES purchase_sales(id) ON DELETE SET NULL,
    expense_date DATE NOT NULL,
    notes TEXT,
    created_by UUID REFERENCES users(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expense_amount CHECK (amount > 0)
);

CREATE INDEX idx_expenses_date ON expenses(expense_date DESC);
CREATE INDEX idx_expenses_category ON expenses(category_id);
CREATE INDEX idx_expenses_vehicle ON expenses(vehicle_id);
CREATE INDEX idx_expenses_trip ON expenses(trip_id);

ALTER TABLE purchase_sales
    ADD CONSTRAINT fk_purchase_sales_completion_expense
    FOREIGN KEY (completion_expense_id) REFERENCES expenses(id) ON DELETE SET NULL;
";

const TRIGGERS_SQL: &str = r"
CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_branches_updated_at BEFORE UPDATE ON branches
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_vehicles_updated_at BEFORE UPDATE ON vehicles
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_categories_updated_at BEFORE UPDATE ON categories
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_trips_updated_at BEFORE UPDATE ON trips
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_purchases_updated_at BEFORE UPDATE ON purchases
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_purchase_sales_updated_at BEFORE UPDATE ON purchase_sales
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_ledger_txns_updated_at BEFORE UPDATE ON purchase_sale_transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_expenses_updated_at BEFORE UPDATE ON expenses
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS purchase_sales CASCADE;
DROP TABLE IF EXISTS purchase_sale_transactions CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS purchases CASCADE;
DROP TABLE IF EXISTS trips CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS vehicles CASCADE;
DROP TABLE IF EXISTS branches CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;
DROP TYPE IF EXISTS ledger_transaction_kind;
DROP TYPE IF EXISTS ledger_status;
DROP TYPE IF EXISTS trip_status;
DROP TYPE IF EXISTS expense_type;
";
