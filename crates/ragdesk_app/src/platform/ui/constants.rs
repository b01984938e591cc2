pub const PROMPT: &str = "ragdesk> ";

pub const CMD_UPLOAD: &str = "/upload";
pub const CMD_STATUS: &str = "/status";
pub const CMD_EXPORT: &str = "/export";
pub const CMD_HELP: &str = "/help";
pub const CMD_QUIT: &str = "/quit";
pub const CMD_EXIT: &str = "/exit";

pub const COMMANDS: [&str; 6] = [
    CMD_UPLOAD, CMD_STATUS, CMD_EXPORT, CMD_HELP, CMD_QUIT, CMD_EXIT,
];

pub const HELP_TEXT: &str = "\
Type a question and press Enter to ask it. Shift+Enter or Alt+Enter adds a line.
Drag files onto this window (or paste their paths) to upload them.

  /upload <file>...   upload files
  /status             re-check backend health and the indexed file list
  /export <file>      save the transcript as HTML
  /help               show this help
  /quit               leave (Ctrl-D also works)";
