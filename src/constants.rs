/// 每天毫秒数
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// 新卡片初始难度系数（SM-2 起始 ease factor）
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// 遗忘曲线图表最大水平跨度（天）
pub const MAX_CURVE_HORIZON_DAYS: f64 = 365.0;
