/// Configuration file names and lookup locations
pub mod files {
    pub const CONFIG_FILE_NAME: &str = "chatview.toml";
    pub const CONFIG_DIR_NAME: &str = ".chatview";
}

/// Layout geometry shared by the markdown renderer and the table layout
pub mod layout {
    /// Narrowest a table column is ever allowed to shrink to.
    pub const MIN_COLUMN_WIDTH: usize = 3;

    /// Width of the `  • ` bullet prefix.
    pub const LIST_PREFIX_WIDTH: usize = 4;

    /// Extra indentation per nesting level of list items.
    pub const LIST_NESTING_INDENT: usize = 2;

    /// Width of the `│ ` quote bar.
    pub const BLOCKQUOTE_PREFIX_WIDTH: usize = 2;

    /// Horizontal rule width used when wrapping is disabled.
    pub const UNBOUNDED_RULE_WIDTH: usize = 32;

    /// Maximum heading depth recognised by the line classifier.
    pub const MAX_HEADING_LEVEL: usize = 4;

    pub const DEFAULT_RENDER_CACHE_CAPACITY: usize = 64;
}

/// Glyphs drawn by the renderer
pub mod glyphs {
    pub const BULLET: &str = "•";
    pub const BLOCKQUOTE_BAR: &str = "│";
    pub const RULE: &str = "─";

    /// Tool invocation marker inside assistant messages.
    pub const TOOL_CALL_MARKER: char = '⏺';
    /// Tool result marker inside assistant messages.
    pub const TOOL_RESULT_MARKER: char = '⎿';

    pub mod table {
        pub const TOP_LEFT: &str = "┌";
        pub const TOP_MID: &str = "┬";
        pub const TOP_RIGHT: &str = "┐";
        pub const MID_LEFT: &str = "├";
        pub const MID_MID: &str = "┼";
        pub const MID_RIGHT: &str = "┤";
        pub const BOTTOM_LEFT: &str = "└";
        pub const BOTTOM_MID: &str = "┴";
        pub const BOTTOM_RIGHT: &str = "┘";
        pub const HORIZONTAL: &str = "─";
        pub const VERTICAL: &str = "│";
    }
}

/// Mouse selection timing and tolerances
pub mod selection {
    /// Cells a follow-up click may drift (on either axis) and still count as a repeat.
    pub const CLICK_TOLERANCE: u16 = 2;
    pub const MULTI_CLICK_WINDOW_MS: u64 = 500;
    pub const FLASH_TICK_MS: u64 = 100;
    /// Frames the copy flash stays on screen before the selection clears.
    pub const FLASH_VISIBLE_FRAMES: u32 = 1;
}

/// Syntax highlighting defaults
pub mod syntax {
    pub const FALLBACK_THEME: &str = "base16-ocean.dark";
    pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;
    pub const DEFAULT_ENABLED_LANGUAGES: &[&str] = &[
        "rust",
        "python",
        "javascript",
        "typescript",
        "go",
        "java",
        "cpp",
        "c",
        "php",
        "html",
        "css",
        "sql",
        "csharp",
        "bash",
        "sh",
        "json",
        "toml",
        "yaml",
        "diff",
    ];
}

/// Diff header prefixes recognised by the diff colorizer
pub mod diff {
    pub const HEADER_PREFIXES: &[&str] = &["diff ", "index ", "--- ", "+++ "];
    pub const HUNK_PREFIX: &str = "@@";
}
