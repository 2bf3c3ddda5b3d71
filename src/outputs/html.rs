//! HTML report rendering.
//!
//! Produces one self-contained document (inline CSS, no scripts, no external
//! assets): a header with stat tiles, a three-bar rating distribution and one
//! card per idea in input order. Every piece of topic-derived text goes through
//! [`escape_html`], so hot-search content cannot inject markup.

use crate::models::{IdeaRecord, Rating, RatingSummary, MAX_INTERESTING_SCORE, MAX_USEFULNESS_SCORE};
use crate::utils::{escape_html, group_thousands};
use chrono::NaiveDateTime;
use itertools::Itertools;

/// Pixel height per idea in a distribution bar.
const BAR_PX_PER_IDEA: usize = 30;
/// Minimum bar height, so empty tiers still show a stub.
const BAR_MIN_PX: usize = 20;

/// Height of a distribution bar for a tier count.
pub fn bar_height(count: usize) -> usize {
    (count * BAR_PX_PER_IDEA).max(BAR_MIN_PX)
}

/// Render the full report document.
pub fn render_report(ideas: &[IdeaRecord], generated_at: NaiveDateTime) -> String {
    let summary = RatingSummary::from_ideas(ideas);
    let cards = ideas
        .iter()
        .enumerate()
        .map(|(i, idea)| render_card(i + 1, idea))
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>微博热搜产品创意分析报告</title>
    <style>{css}</style>
</head>
<body>
    {header}
    <div class="container">
        <h2 class="section-title">评分分布</h2>
        {distribution}
        <h2 class="section-title">产品创意详情</h2>
        {cards}
    </div>
    {footer}
</body>
</html>"#,
        css = inline_css(),
        header = render_header(ideas.len(), &summary, generated_at),
        distribution = render_distribution(&summary),
        cards = cards,
        footer = render_footer(),
    )
}

fn render_header(total: usize, summary: &RatingSummary, generated_at: NaiveDateTime) -> String {
    format!(
        r#"<div class="header">
        <h1>微博热搜产品创意分析报告</h1>
        <p>分析时间：{timestamp}</p>
        <div class="stats">
            <div class="stat-item" data-tier="all">
                <div class="stat-num">{total}</div>
                <div class="stat-label">热搜总数</div>
            </div>
            <div class="stat-item" data-tier="excellent">
                <div class="stat-num" style="color: #a7f3d0;">{excellent}</div>
                <div class="stat-label">优秀创意</div>
            </div>
            <div class="stat-item" data-tier="good">
                <div class="stat-num" style="color: #93c5fd;">{good}</div>
                <div class="stat-label">良好创意</div>
            </div>
            <div class="stat-item" data-tier="normal">
                <div class="stat-num" style="color: #d1d5db;">{normal}</div>
                <div class="stat-label">普通创意</div>
            </div>
        </div>
    </div>"#,
        timestamp = generated_at.format("%Y-%m-%d %H:%M:%S"),
        total = total,
        excellent = summary.excellent,
        good = summary.good,
        normal = summary.normal,
    )
}

fn render_distribution(summary: &RatingSummary) -> String {
    let bar = |extra_class: &str, count: usize, rating: Rating| {
        format!(
            r#"<div class="dist-item">
            <div class="dist-bar-wrapper">
                <div class="dist-bar{extra_class}" style="height: {height}px"></div>
            </div>
            <span class="dist-label">{label}({count})</span>
        </div>"#,
            height = bar_height(count),
            label = rating.label(),
        )
    };

    format!(
        r#"<div class="distribution">
        {}
        {}
        {}
    </div>"#,
        bar("", summary.excellent, Rating::Excellent),
        bar(" dist-good", summary.good, Rating::Good),
        bar(" dist-normal", summary.normal, Rating::Normal),
    )
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .join("")
}

fn tags(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<span class='tag'>{}</span>", escape_html(item)))
        .join(", ")
}

fn percent(score: u32, max: u32) -> f64 {
    f64::from(score) / f64::from(max) * 100.0
}

fn render_card(rank: usize, idea: &IdeaRecord) -> String {
    let bg = &idea.background;
    let monetization = idea
        .monetization
        .iter()
        .map(|m| format!("<li><span class='money-icon'>💰</span>{}</li>", escape_html(m)))
        .join("");

    format!(
        r#"<div class="idea-card {rating_class}">
            <div class="idea-header">
                <div class="rank-badge">#{rank}</div>
                <h3>{product_name}</h3>
                <span class="score-badge score-{rating_class}">{rating_label} · {total}分</span>
            </div>
            <div class="topic-info">
                <span class="topic-label">热搜话题:</span>
                <span class="topic-value">{topic}</span>
                <span class="heat-value">热度: {heat}</span>
            </div>
            <div class="section">
                <h4>📋 事件背景</h4>
                <p class="background-text">{summary}</p>
            </div>
            <div class="section">
                <h4>📅 事件脉络</h4>
                <ul class="timeline">{timeline}</ul>
            </div>
            <div class="section">
                <h4>📍 当前状态</h4>
                <p class="status-badge">{status}</p>
            </div>
            <div class="section">
                <h4>💬 舆论焦点</h4>
                <div class="tags-container">{focus}</div>
            </div>
            <div class="section">
                <h4>👥 相关主体</h4>
                <div class="tags-container">{parties}</div>
            </div>
            <hr class="divider">
            <div class="score-detail">
                <div class="score-item">
                    <span class="score-label">有趣度</span>
                    <div class="score-bar-container">
                        <div class="score-bar interesting-bar" style="width: {interesting_pct:.1}%"></div>
                    </div>
                    <span class="score-value">{interesting}/{max_interesting}</span>
                </div>
                <div class="score-item">
                    <span class="score-label">有用度</span>
                    <div class="score-bar-container">
                        <div class="score-bar usefulness-bar" style="width: {usefulness_pct:.1}%"></div>
                    </div>
                    <span class="score-value">{usefulness}/{max_usefulness}</span>
                </div>
            </div>
            <div class="section product-section">
                <h4>💡 产品创意方案</h4>
                <div class="product-name">{product_name}</div>
                <div class="section-subtitle">核心功能</div>
                <ul class="features-list">{features}</ul>
                <div class="section-subtitle">目标用户</div>
                <p class="target-users">{target_users}</p>
                <div class="section-subtitle">分析理由</div>
                <p class="reason-text">{reason}</p>
            </div>
            <div class="section monetization-section">
                <h4>💵 变现路径</h4>
                <ul class="monetization-list">{monetization}</ul>
            </div>
        </div>"#,
        rating_class = idea.rating.css_class(),
        rating_label = idea.rating.label(),
        rank = rank,
        product_name = escape_html(&idea.product_name),
        total = idea.total_score,
        topic = escape_html(&idea.topic),
        heat = group_thousands(idea.popularity),
        summary = escape_html(&bg.summary),
        timeline = list_items(&bg.timeline),
        status = escape_html(&bg.status),
        focus = tags(&bg.discussion_focus),
        parties = tags(&bg.related_parties),
        interesting_pct = percent(idea.interesting_score, MAX_INTERESTING_SCORE),
        interesting = idea.interesting_score,
        max_interesting = MAX_INTERESTING_SCORE,
        usefulness_pct = percent(idea.usefulness_score, MAX_USEFULNESS_SCORE),
        usefulness = idea.usefulness_score,
        max_usefulness = MAX_USEFULNESS_SCORE,
        features = list_items(&idea.core_features),
        target_users = escape_html(&idea.target_users),
        reason = escape_html(&idea.reason),
        monetization = monetization,
    )
}

fn render_footer() -> &'static str {
    r#"<div class="footer">
        <p>由 weibo_trend_ideas 自动生成</p>
        <p style="margin-top: 8px; opacity: 0.7;">评分标准：有趣度(80%) + 有用度(20%) | 包含事件脉络、背景分析、产品创意、变现路径</p>
    </div>"#
}

/// Inline stylesheet for the report.
fn inline_css() -> &'static str {
    r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", "Hiragino Sans GB", sans-serif;
    background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
    color: #333;
    line-height: 1.6;
    min-height: 100vh;
}

/* Header */
.header {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    padding: 50px 20px;
    text-align: center;
}
.header h1 { font-size: 32px; margin-bottom: 15px; text-shadow: 0 2px 4px rgba(0,0,0,0.2); }
.header p { opacity: 0.95; font-size: 15px; margin-bottom: 5px; }
.stats { display: flex; justify-content: center; gap: 20px; margin-top: 25px; flex-wrap: wrap; }
.stat-item {
    text-align: center;
    background: rgba(255,255,255,0.15);
    padding: 20px 30px;
    border-radius: 15px;
    border: 1px solid rgba(255,255,255,0.2);
    min-width: 120px;
}
.stat-num { font-size: 36px; font-weight: bold; }
.stat-label { font-size: 13px; opacity: 0.9; margin-top: 5px; }

.container { max-width: 1100px; margin: 0 auto; padding: 30px 20px; }

/* Distribution */
.distribution {
    display: flex;
    justify-content: center;
    align-items: flex-end;
    gap: 50px;
    padding: 40px;
    background: rgba(255,255,255,0.95);
    border-radius: 16px;
    margin-bottom: 30px;
}
.dist-item { text-align: center; }
.dist-bar-wrapper { height: 120px; display: flex; align-items: flex-end; justify-content: center; margin-bottom: 12px; }
.dist-bar { width: 70px; background: linear-gradient(180deg, #10b981, #059669); border-radius: 8px 8px 0 0; }
.dist-good { background: linear-gradient(180deg, #3b82f6, #2563eb); }
.dist-normal { background: linear-gradient(180deg, #9ca3af, #6b7280); }
.dist-label { font-weight: 600; color: #374151; }

.section-title { font-size: 22px; color: white; margin: 35px 0 20px; padding-left: 15px; border-left: 4px solid #667eea; }

/* Cards */
.idea-card {
    position: relative;
    background: rgba(255,255,255,0.98);
    border-radius: 16px;
    padding: 28px;
    margin-bottom: 25px;
    box-shadow: 0 8px 30px rgba(0,0,0,0.15);
}
.excellent { border-left: 6px solid #10b981; background: linear-gradient(to right, #ecfdf5, white); }
.excellent::before { content: "★"; position: absolute; top: 15px; right: 20px; font-size: 24px; color: #10b981; }
.good { border-left: 6px solid #3b82f6; background: linear-gradient(to right, #eff6ff, white); }
.normal { border-left: 6px solid #9ca3af; background: #fafafa; }

.idea-header { display: flex; align-items: center; margin-bottom: 15px; padding-right: 50px; }
.rank-badge {
    background: linear-gradient(135deg, #667eea, #764ba2);
    color: white;
    width: 36px;
    height: 36px;
    border-radius: 50%;
    display: flex;
    align-items: center;
    justify-content: center;
    font-weight: bold;
    margin-right: 15px;
}
.idea-header h3 { font-size: 22px; color: #1a1a2e; font-weight: 700; flex: 1; }
.score-badge { padding: 8px 18px; border-radius: 25px; font-size: 15px; font-weight: bold; color: white; }
.score-excellent { background: linear-gradient(135deg, #10b981, #059669); }
.score-good { background: linear-gradient(135deg, #3b82f6, #2563eb); }
.score-normal { background: linear-gradient(135deg, #9ca3af, #6b7280); }

.topic-info { background: #f8fafc; padding: 12px 16px; border-radius: 10px; margin-bottom: 20px; display: flex; align-items: center; flex-wrap: wrap; gap: 10px; }
.topic-label { color: #6b7280; font-size: 14px; }
.topic-value { background: #fef08a; color: #854d0e; font-weight: 700; font-size: 15px; padding: 6px 14px; border-radius: 8px; }
.heat-value { margin-left: auto; color: #ef4444; font-weight: 600; }

.section { margin-bottom: 18px; }
.section h4 { font-size: 16px; color: #1e293b; margin-bottom: 10px; font-weight: 600; }
.section-subtitle { font-size: 13px; color: #6b7280; margin: 15px 0 8px; font-weight: 500; }
.background-text { color: #475569; font-size: 14px; line-height: 1.8; }
.status-badge { display: inline-block; background: #fef3c7; color: #92400e; padding: 6px 14px; border-radius: 20px; font-size: 13px; }
.timeline { padding-left: 20px; }
.timeline li { margin-bottom: 8px; color: #475569; font-size: 14px; }
.tags-container { display: flex; flex-wrap: wrap; gap: 8px; }
.tag { background: #e0e7ff; color: #4338ca; padding: 5px 12px; border-radius: 15px; font-size: 13px; }
.divider { border: none; border-top: 1px dashed #e5e7eb; margin: 20px 0; }

/* Scores */
.score-detail { display: flex; flex-direction: column; gap: 12px; margin-bottom: 20px; }
.score-item { display: flex; align-items: center; gap: 15px; }
.score-label { width: 60px; font-size: 14px; color: #6b7280; }
.score-bar-container { flex: 1; height: 10px; background: #e5e7eb; border-radius: 5px; overflow: hidden; }
.score-bar { height: 100%; border-radius: 5px; }
.interesting-bar { background: linear-gradient(90deg, #667eea, #764ba2); }
.usefulness-bar { background: linear-gradient(90deg, #10b981, #059669); }
.score-value { width: 50px; text-align: right; font-size: 14px; font-weight: 600; color: #374151; }

/* Product */
.product-section { background: #f8fafc; padding: 20px; border-radius: 12px; margin-bottom: 20px; }
.product-name { font-size: 20px; font-weight: 700; color: #667eea; margin-bottom: 15px; }
.features-list { padding-left: 20px; margin-bottom: 15px; }
.features-list li { margin-bottom: 6px; color: #475569; }
.target-users { color: #475569; font-size: 14px; margin-bottom: 10px; }
.reason-text { color: #64748b; font-size: 14px; line-height: 1.7; background: #fff; padding: 12px; border-radius: 8px; border-left: 3px solid #667eea; }
.monetization-section { background: linear-gradient(135deg, #ecfdf5, #d1fae5); padding: 15px 20px; border-radius: 12px; }
.monetization-section h4 { color: #065f46; }
.monetization-list { display: flex; flex-wrap: wrap; gap: 10px; list-style: none; }
.monetization-list li { background: white; padding: 8px 14px; border-radius: 8px; font-size: 13px; color: #065f46; }

.footer { text-align: center; padding: 40px 20px; color: rgba(255,255,255,0.6); font-size: 13px; }
"#
}
