//! Schema statements, applied in order at startup.

/// Idempotent DDL for the whole schema.
pub const MIGRATIONS: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        is_staff INTEGER NOT NULL DEFAULT 0
    )",
    r"CREATE TABLE IF NOT EXISTS profiles (
        user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        registration_date INTEGER NOT NULL,
        is_seller INTEGER NOT NULL DEFAULT 0,
        avatar TEXT,
        funds TEXT NOT NULL DEFAULT '0.00',
        purchases INTEGER NOT NULL DEFAULT 0 CHECK (purchases >= 0)
    )",
    r"CREATE TABLE IF NOT EXISTS sessions (
        token_hash TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS shops (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        seller_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        tags TEXT NOT NULL DEFAULT '',
        logo TEXT
    )",
    r"CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        shop_id INTEGER NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
        code INTEGER NOT NULL UNIQUE,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price TEXT NOT NULL,
        amount INTEGER NOT NULL DEFAULT 0 CHECK (amount >= 0),
        is_promotion INTEGER NOT NULL DEFAULT 0,
        is_offer INTEGER NOT NULL DEFAULT 0
    )",
    r"CREATE TABLE IF NOT EXISTS item_files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        path TEXT NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS cart_lines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity >= 1),
        UNIQUE (user_id, item_id)
    )",
    r"CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        created INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'o' CHECK (status IN ('o', 'b')),
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )",
    r"CREATE TABLE IF NOT EXISTS ordered_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity >= 1),
        total_cost TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_items_shop ON items (shop_id)",
    "CREATE INDEX IF NOT EXISTS idx_item_files_item ON item_files (item_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_user_created ON orders (user_id, created)",
    "CREATE INDEX IF NOT EXISTS idx_ordered_items_order ON ordered_items (order_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions (user_id)",
];
