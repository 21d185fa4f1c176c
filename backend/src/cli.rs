use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "padel league scorekeeper")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Print the league table
    Table,
    /// Print the schedule with recorded results
    Fixtures,
    /// Print player ratings
    Ratings {
        /// Highlight the ratings given by this team
        #[arg(long)]
        team: Option<String>,
    },
    /// Record the result of a fixture
    Record {
        /// Fixture index in the schedule (0-based)
        #[arg(long)]
        fixture: usize,
        /// Winning team id
        #[arg(long)]
        winner: u32,
        /// Set scores, e.g. "6-3,6-4" (prompted when omitted)
        #[arg(long)]
        score: Option<String>,
    },
    /// Rate a player on behalf of a team
    Rate {
        #[arg(long)]
        player: String,
        /// Name of the submitting team
        #[arg(long)]
        from_team: String,
        /// Score from 1 to 5
        #[arg(long)]
        score: i64,
    },
    /// Print the whole league as JSON
    Export,
    /// Privileged edits (asks for the admin password)
    Admin {
        /// Admin password (prompted when omitted)
        #[arg(long)]
        secret: Option<String>,
        #[clap(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum AdminAction {
    /// Record a result, overwriting any existing one
    Record {
        #[arg(long)]
        fixture: usize,
        #[arg(long)]
        winner: u32,
        #[arg(long)]
        score: Option<String>,
    },
    /// Change an existing result
    EditResult {
        #[arg(long)]
        fixture: usize,
        #[arg(long)]
        winner: u32,
        #[arg(long)]
        score: Option<String>,
    },
    /// Delete the result of a fixture
    DeleteResult {
        #[arg(long)]
        fixture: usize,
    },
    /// Delete the result with the highest fixture index
    ClearLastResult,
    /// Delete every result
    ClearResults {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Rate a player, allowing repeat ratings from the same team
    Rate {
        #[arg(long)]
        player: String,
        #[arg(long)]
        from_team: String,
        #[arg(long)]
        score: i64,
    },
    /// Change the score of one rating
    EditRating {
        #[arg(long)]
        player: String,
        /// Position in the player's rating list (0-based)
        #[arg(long)]
        index: usize,
        #[arg(long)]
        score: i64,
    },
    /// Delete one rating
    DeleteRating {
        #[arg(long)]
        player: String,
        #[arg(long)]
        index: usize,
    },
    /// Delete the most recently submitted rating
    ClearLastRating,
    /// Delete every rating
    ClearRatings {
        #[arg(long)]
        yes: bool,
    },
}
