//! Canned reply engine.
//!
//! Replies are chosen from an ordered rule table by case-insensitive
//! substring matching. The first matching rule wins; when nothing matches,
//! the fallback template echoes the input back. Deterministic, synchronous,
//! and side-effect free.

/// Marketing tips for a self-service car wash.
pub const MARKETING_TIPS: &str = "自助洗车店营销建议：\n1. 推出9.9元体验套餐，吸引首次到店；\n2. 建立会员体系，充值送次数/礼品；\n3. 本地抖音/视频号发布洗车教程，引流到店；\n4. 与周边小区/加油站合作，互相导流。";

/// Car-wash industry figures.
pub const INDUSTRY_STATS: &str = "洗车行业核心数据：\n1. 自助洗车单店日均客流量约50-80辆；\n2. 客单价集中在10-20元；\n3. 周末客流量是工作日的1.5-2倍；\n4. 25-40岁车主是核心消费群体。";

/// Sample ad copy.
pub const SAMPLE_AD_COPY: &str = "【洗车店引流文案】\n标题：9.9元洗干净爱车！再也不用等1小时排队了\n内容：家门口的自助洗车店，随到随洗，高压水枪+泡沫+吸尘一站式搞定，省钱又省心！现在到店还送玻璃水~";

/// A single entry in the reply table.
///
/// Matches when every keyword group has at least one keyword contained in
/// the lowercased input. Keywords are stored lowercase.
#[derive(Debug, Clone)]
pub struct ReplyRule {
    name: String,
    groups: Vec<Vec<String>>,
    response: String,
}

impl ReplyRule {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
            response: response.into(),
        }
    }

    /// Require at least one of `keywords` to appear in the input.
    pub fn requires_any(mut self, keywords: &[&str]) -> Self {
        self.groups
            .push(keywords.iter().map(|k| k.to_lowercase()).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// A rule without keyword groups never matches.
    fn matches(&self, lowered: &str) -> bool {
        !self.groups.is_empty()
            && self
                .groups
                .iter()
                .all(|group| group.iter().any(|k| lowered.contains(k.as_str())))
    }
}

/// Ordered rule table plus fallback.
#[derive(Debug, Clone)]
pub struct ReplyEngine {
    rules: Vec<ReplyRule>,
}

impl ReplyEngine {
    pub fn new(rules: Vec<ReplyRule>) -> Self {
        Self { rules }
    }

    /// Append a rule after the existing ones (lowest precedence).
    pub fn push_rule(&mut self, rule: ReplyRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }

    /// Pick the reply for `input`.
    ///
    /// `input` is expected to be sanitized already; the fallback embeds it
    /// verbatim.
    pub fn reply(&self, input: &str) -> String {
        let lowered = input.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => {
                tracing::debug!(rule = %rule.name, "Reply rule matched");
                rule.response.clone()
            }
            None => fallback_reply(input),
        }
    }
}

impl Default for ReplyEngine {
    /// The marketing, statistics, and ad-copy rules, in that order.
    fn default() -> Self {
        Self::new(vec![
            ReplyRule::new("marketing", MARKETING_TIPS)
                .requires_any(&["洗车", "wash"])
                .requires_any(&["营销", "marketing"]),
            ReplyRule::new("statistics", INDUSTRY_STATS)
                .requires_any(&["数据", "分析", "data", "analytics"]),
            ReplyRule::new("ad-copy", SAMPLE_AD_COPY)
                .requires_any(&["文案", "创作", "copy", "content"]),
        ])
    }
}

/// Template used when no rule matches.
pub fn fallback_reply(input: &str) -> String {
    format!(
        "您的问题是：「{input}」\n\n这是智能回复示例，您可以基于实际需求扩展此功能，对接真实AI API即可实现更精准的回复。"
    )
}
