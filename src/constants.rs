//! Application constants and configuration

pub const QUOTE_HOST: &str = "https://query1.finance.yahoo.com";
pub const NEWS_FEED_URL: &str =
    "https://news.google.com/rss/search?q=finance&hl=en-IN&gl=IN&ceid=IN:en";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const USER_AGENT: &str = concat!("nifty-lens/", env!("CARGO_PKG_VERSION"));

/// Headlines kept from the news feed
pub const NEWS_LIMIT: usize = 5;

/// Default simple moving average window (days)
pub const DEFAULT_MA_WINDOW: usize = 20;
pub const MA_WINDOW_MIN: usize = 5;
pub const MA_WINDOW_MAX: usize = 200;

/// Default live watch poll interval (seconds)
pub const DEFAULT_POLL_SECS: u64 = 10;
pub const POLL_SECS_MIN: u64 = 2;
pub const POLL_SECS_MAX: u64 = 120;

/// Moves kept in the live trend buffer
pub const TREND_SAMPLES: usize = 3;

/// Concurrent history fetches during watchlist prefetch
pub const PREFETCH_PARALLELISM: usize = 4;

/// NSE tickers tracked by the app: (code, company, sector)
pub const EQUITY_UNIVERSE: &[(&str, &str, &str)] = &[
    ("RELIANCE.NS", "Reliance Industries", "Energy"),
    ("TCS.NS", "Tata Consultancy Services", "IT"),
    ("HDFCBANK.NS", "HDFC Bank", "Banking"),
    ("INFY.NS", "Infosys", "IT"),
    ("HINDUNILVR.NS", "Hindustan Unilever", "FMCG"),
    ("ICICIBANK.NS", "ICICI Bank", "Banking"),
    ("KOTAKBANK.NS", "Kotak Mahindra Bank", "Banking"),
    ("SBIN.NS", "State Bank of India", "Banking"),
    ("BHARTIARTL.NS", "Bharti Airtel", "Telecom"),
    ("ASIANPAINT.NS", "Asian Paints", "Consumer"),
    ("HDFC.NS", "Housing Development Finance Corp", "Financials"),
    ("ITC.NS", "ITC", "FMCG"),
    ("BAJFINANCE.NS", "Bajaj Finance", "Financials"),
    ("WIPRO.NS", "Wipro", "IT"),
    ("ADANIPORTS.NS", "Adani Ports & SEZ", "Infrastructure"),
    ("MARUTI.NS", "Maruti Suzuki", "Auto"),
    ("LT.NS", "Larsen & Toubro", "Infrastructure"),
    ("AXISBANK.NS", "Axis Bank", "Banking"),
    ("TITAN.NS", "Titan Company", "Consumer"),
    ("NESTLEIND.NS", "Nestle India", "FMCG"),
    ("POWERGRID.NS", "Power Grid Corp", "Energy"),
    ("NTPC.NS", "NTPC", "Energy"),
    ("HCLTECH.NS", "HCL Technologies", "IT"),
    ("M&M.NS", "Mahindra & Mahindra", "Auto"),
    ("ULTRACEMCO.NS", "UltraTech Cement", "Materials"),
    ("SUNPHARMA.NS", "Sun Pharmaceutical", "Pharma"),
    ("DRREDDY.NS", "Dr. Reddy's Laboratories", "Pharma"),
    ("TECHM.NS", "Tech Mahindra", "IT"),
    ("INDUSINDBK.NS", "IndusInd Bank", "Banking"),
    ("TATASTEEL.NS", "Tata Steel", "Metals"),
];

/// Sectors present in the universe, in sidebar display order
pub const SECTORS: &[&str] = &[
    "Banking",
    "IT",
    "FMCG",
    "Energy",
    "Auto",
    "Pharma",
    "Financials",
    "Consumer",
    "Telecom",
    "Infrastructure",
    "Materials",
    "Metals",
];
