pub mod caches;

/// Default page size for list endpoints that don't take explicit pagination
/// params (spec.md §6's product search/list surface).
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Hard cap on tool-call round trips within a single chat turn, guarding
/// against a misbehaving model looping forever (spec.md §4.H's state
/// machine: `ExecutingTools -> WaitingModel` must eventually reach `Done`).
pub const MAX_CHAT_TOOL_ROUNDS: u8 = 6;
