/// Separator between flags in a target's flag string.
pub const SEPARATOR: char = ';';

/// Persistence key holding the serialized managed token list.
pub const MANAGED_TOKENS_KEY: &str = "managed_tokens";

/// Token seeded into the managed list when nothing has been persisted yet.
pub const DEFAULT_SEED_TOKEN: &str = "ENABLE_DEBUG_TOOLS";
