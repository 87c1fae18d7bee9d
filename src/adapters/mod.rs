// Adapters layer: concrete implementations of the domain ports (search provider, record stores).

pub mod search;
pub mod storage;
pub mod supabase;
