//! Product-idea scoring.
//!
//! A topic is classified with its own ordered keyword table (independent of the
//! background table) into one of ten categories, or the generic fallback. Each
//! category carries a fixed product concept with base scores. The interest score
//! then receives a heat bonus of one point per 200,000 searches, at most 10,
//! and is capped at 80.

use crate::models::{
    BackgroundRecord, IdeaRecord, Rating, TopicRecord, MAX_INTERESTING_SCORE,
};
use crate::rules::{first_match, KeywordRule};

/// Searches needed for one point of heat bonus.
pub const HEAT_STEP: u64 = 200_000;

/// Maximum heat bonus.
pub const MAX_HEAT_FACTOR: u64 = 10;

const FALLBACK_SUFFIX: &str = "热点通";
const FALLBACK_PREFIX_CHARS: usize = 4;
const FALLBACK_INTERESTING: u32 = 68;
const FALLBACK_USEFULNESS: u32 = 14;

/// Static payload of a scoring rule.
#[derive(Debug)]
pub struct IdeaTemplate {
    pub product_name: &'static str,
    pub core_features: &'static [&'static str],
    pub target_users: &'static str,
    pub base_interesting: u32,
    pub base_usefulness: u32,
    pub reason: &'static str,
    pub monetization: &'static [&'static str],
}

pub static IDEA_RULES: &[KeywordRule<IdeaTemplate>] = &[
    KeywordRule {
        keywords: &["国考", "公务员", "申论", "考试", "成绩"],
        payload: IdeaTemplate {
            product_name: "公考通",
            core_features: &[
                "笔试成绩快速查询和对比",
                "智能面试模拟和点评",
                "岗位竞争比分析",
                "备考计划和进度管理",
                "历年真题和解析",
                "考生经验社区",
            ],
            target_users: "备考公务员/事业单位的考生群体",
            base_interesting: 75,
            base_usefulness: 19,
            reason: "国考是年度重大考试，备考周期长、需求刚性。用户需要成绩查询、面试准备、岗位选择等一站式服务。产品可切入面试培训、资料付费、会员服务等变现路径。",
            monetization: &["面试培训班", "付费真题", "VIP会员", "岗位内推服务"],
        },
    },
    KeywordRule {
        keywords: &["携程", "旅游", "酒店", "机票"],
        payload: IdeaTemplate {
            product_name: "价格卫士",
            core_features: &[
                "机票酒店价格监控和提醒",
                "历史价格查询和对比",
                "大数据杀熟检测",
                "比价和最优推荐",
                "用户评价聚合",
            ],
            target_users: "经常出差和旅行的用户、价格敏感型消费者",
            base_interesting: 72,
            base_usefulness: 18,
            reason: "携程垄断争议反映出用户对价格透明的需求强烈。该产品可以帮助用户避免大数据杀熟，节省旅行开支，具有明确的使用价值和付费意愿。",
            monetization: &["会员订阅", "返利分成", "广告推广"],
        },
    },
    KeywordRule {
        keywords: &["经济", "工作", "政策", "投资"],
        payload: IdeaTemplate {
            product_name: "政策解读官",
            core_features: &[
                "经济政策通俗解读",
                "投资机会挖掘",
                "行业影响分析",
                "个人应对建议",
                "专家直播解读",
            ],
            target_users: "投资者、企业主、关注财经的个人用户",
            base_interesting: 73,
            base_usefulness: 17,
            reason: "经济政策与每个人息息相关，但原文晦涩难懂。用户需要通俗化的解读和实操建议。产品可以切入知识付费、专家咨询等变现路径。",
            monetization: &["付费解读", "专家咨询", "课程销售", "投资推荐"],
        },
    },
    KeywordRule {
        keywords: &["花海", "明星", "恋情", "聊天"],
        payload: IdeaTemplate {
            product_name: "追星小助手",
            core_features: &[
                "明星动态实时推送",
                "粉丝社区互动",
                "周边产品购买",
                "行程和活动提醒",
                "高清图包和资源",
            ],
            target_users: "粉丝群体、追星族",
            base_interesting: 78,
            base_usefulness: 14,
            reason: "粉丝经济规模庞大，用户愿意为偶像相关内容付费。产品可以聚合粉丝需求，提供一站式服务，变现路径清晰。",
            monetization: &["周边商城", "会员特权", "打赏", "付费内容"],
        },
    },
    KeywordRule {
        keywords: &["河南", "教师", "学生", "校园", "师德"],
        payload: IdeaTemplate {
            product_name: "校园安全卫士",
            core_features: &[
                "校园安全事件预警",
                "教师资质查询",
                "学校评价和口碑",
                "家长社区交流",
                "维权帮助和指引",
            ],
            target_users: "学生家长、教育工作者、关心教育的公众",
            base_interesting: 70,
            base_usefulness: 19,
            reason: "校园安全和师德问题是社会痛点，家长需要了解学校和教师的真实情况。产品可以提供透明信息，建立信任，变现路径包括学校认证费、家长会员等。",
            monetization: &["学校认证费", "家长会员", "广告合作"],
        },
    },
    KeywordRule {
        keywords: &["汪苏泷", "代言", "潮流", "时尚"],
        payload: IdeaTemplate {
            product_name: "潮流新品速报",
            core_features: &[
                "明星代言新品追踪",
                "潮流趋势解读",
                "同款购买链接聚合",
                "穿搭和搭配建议",
                "社区讨论和种草",
            ],
            target_users: "潮流爱好者、粉丝群体、年轻消费者",
            base_interesting: 76,
            base_usefulness: 15,
            reason: "明星带货效应显著，用户希望快速获取同款信息和购买渠道。产品可以聚合潮流资讯和购买入口，变现路径包括返利和广告。",
            monetization: &["返利佣金", "品牌广告", "会员服务"],
        },
    },
    KeywordRule {
        keywords: &["王安宇", "周也", "影视", "剧"],
        payload: IdeaTemplate {
            product_name: "追剧日历",
            core_features: &[
                "新剧开播提醒",
                "演员作品合集",
                "剧情讨论社区",
                "资源和下载链接",
                "收视数据和热度追踪",
            ],
            target_users: "追剧族、明星粉丝、影视爱好者",
            base_interesting: 77,
            base_usefulness: 15,
            reason: "追剧是大众娱乐刚需，用户需要一个统一的管理工具。产品可以聚合资源，建立社区，变现路径包括会员、广告等。",
            monetization: &["会员去广告", "资源付费", "周边销售"],
        },
    },
    KeywordRule {
        keywords: &["美食", "吃", "餐厅", "食谱"],
        payload: IdeaTemplate {
            product_name: "美食侦探",
            core_features: &[
                "附近美食推荐",
                "网红店打卡攻略",
                "美食博主推荐",
                "避雷和真实评价",
                "食谱教程和热量计算",
            ],
            target_users: "美食爱好者、社交分享型用户、健康饮食人群",
            base_interesting: 78,
            base_usefulness: 16,
            reason: "美食是社交货币，用户喜欢分享和种草。产品可以聚合餐厅推荐和用户评价，变现路径包括广告、会员、优惠券等。",
            monetization: &["商家推广", "会员优惠", "外卖返利"],
        },
    },
    KeywordRule {
        keywords: &["科技", "芯片", "手机", "数码", "人工智能"],
        payload: IdeaTemplate {
            product_name: "数码尝鲜派",
            core_features: &[
                "新品发布会速览",
                "参数对比和选购建议",
                "首发价格追踪",
                "真实用户测评聚合",
                "以旧换新估价",
            ],
            target_users: "数码爱好者、换机人群、科技从业者",
            base_interesting: 74,
            base_usefulness: 17,
            reason: "科技新品话题自带讨论度，用户在购买前需要快速对比和可信测评。产品可以承接选购决策流量，变现路径包括电商导购和品牌合作。",
            monetization: &["导购佣金", "品牌首发合作", "会员测评报告"],
        },
    },
    KeywordRule {
        keywords: &["体育", "比赛", "冠军", "奥运", "赛事"],
        payload: IdeaTemplate {
            product_name: "赛事通",
            core_features: &[
                "赛程和比分实时推送",
                "精彩集锦回看",
                "球员和战队数据",
                "球迷竞猜互动",
                "观赛社群",
            ],
            target_users: "体育迷、赛事观众、运动爱好者",
            base_interesting: 75,
            base_usefulness: 15,
            reason: "体育赛事热度集中、观众粘性高，用户需要及时的赛况和观赛社群。产品可以围绕赛程提醒和互动玩法变现。",
            monetization: &["会员直播", "周边商城", "赞助广告"],
        },
    },
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Heat bonus for a popularity value: one point per [`HEAT_STEP`], capped.
pub fn heat_factor(popularity: u64) -> u32 {
    // the cap keeps the cast lossless
    (popularity / HEAT_STEP).min(MAX_HEAT_FACTOR) as u32
}

/// Derive the scored product idea for a topic and its background.
///
/// Deterministic and total: the same inputs always produce an identical record.
pub fn score(topic: &TopicRecord, background: &BackgroundRecord) -> IdeaRecord {
    let (product_name, core_features, target_users, base_interesting, usefulness, reason, monetization) =
        match first_match(IDEA_RULES, &topic.name) {
            Some(t) => (
                t.product_name.to_string(),
                to_strings(t.core_features),
                t.target_users.to_string(),
                t.base_interesting,
                t.base_usefulness,
                t.reason.to_string(),
                to_strings(t.monetization),
            ),
            None => (
                format!(
                    "{}{}",
                    topic.name.chars().take(FALLBACK_PREFIX_CHARS).collect::<String>(),
                    FALLBACK_SUFFIX
                ),
                to_strings(&[
                    "热点话题聚合",
                    "事件脉络梳理",
                    "各方观点整理",
                    "深度分析和预测",
                    "相关资源链接",
                ]),
                "关注该领域的用户群体、信息爱好者".to_string(),
                FALLBACK_INTERESTING,
                FALLBACK_USEFULNESS,
                format!(
                    "基于话题'{}'的热点追踪和分析工具，帮助用户快速了解事件全貌和各方观点。",
                    topic.name
                ),
                to_strings(&["付费深度分析", "广告", "会员服务"]),
            ),
        };

    let interesting_score = (base_interesting + heat_factor(topic.popularity)).min(MAX_INTERESTING_SCORE);
    let total_score = interesting_score + usefulness;

    IdeaRecord {
        topic: topic.name.clone(),
        popularity: topic.popularity,
        background: background.clone(),
        product_name,
        core_features,
        target_users,
        interesting_score,
        usefulness_score: usefulness,
        total_score,
        rating: Rating::from_total(total_score),
        reason,
        monetization,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::resolve;
    use crate::models::MAX_USEFULNESS_SCORE;

    fn score_topic(name: &str, popularity: u64) -> IdeaRecord {
        let topic = TopicRecord::new(name, popularity);
        let bg = resolve(&topic.name);
        score(&topic, &bg)
    }

    #[test]
    fn test_civil_service_scenario() {
        let idea = score_topic("国考成绩查询", 500_000);
        assert_eq!(idea.product_name, "公考通");
        assert_eq!(idea.interesting_score, 77);
        assert_eq!(idea.usefulness_score, 19);
        assert_eq!(idea.total_score, 96);
        assert_eq!(idea.rating, Rating::Excellent);
        assert_eq!(idea.background.status, "成绩查询高峰期，面试准备阶段");
    }

    #[test]
    fn test_fallback_scenario() {
        let idea = score_topic("无关话题XYZ", 0);
        assert_eq!(idea.product_name, "无关话题热点通");
        assert_eq!(idea.interesting_score, 68);
        assert_eq!(idea.usefulness_score, 14);
        assert_eq!(idea.total_score, 82);
        assert_eq!(idea.rating, Rating::Excellent);
        assert!(idea.reason.contains("无关话题XYZ"));
    }

    #[test]
    fn test_fallback_short_name() {
        let idea = score_topic("ab", 0);
        assert_eq!(idea.product_name, "ab热点通");
    }

    #[test]
    fn test_heat_factor_saturates() {
        assert_eq!(heat_factor(0), 0);
        assert_eq!(heat_factor(199_999), 0);
        assert_eq!(heat_factor(200_000), 1);
        assert_eq!(heat_factor(1_600_000), 8);
        assert_eq!(heat_factor(2_000_000), 10);
        assert_eq!(heat_factor(u64::MAX), 10);
    }

    #[test]
    fn test_interesting_score_is_capped() {
        // 美食 base is 78; +10 heat must clamp to 80
        let idea = score_topic("美食节", 5_000_000);
        assert_eq!(idea.interesting_score, MAX_INTERESTING_SCORE);
        assert_eq!(idea.total_score, 96);
    }

    #[test]
    fn test_interesting_score_monotonic_in_popularity() {
        let mut last = 0;
        for popularity in (0..3_000_000u64).step_by(100_000) {
            let idea = score_topic("携程被约谈", popularity);
            assert!(idea.interesting_score >= last);
            assert!(idea.interesting_score <= MAX_INTERESTING_SCORE);
            assert!(idea.usefulness_score <= MAX_USEFULNESS_SCORE);
            assert_eq!(idea.total_score, idea.interesting_score + idea.usefulness_score);
            last = idea.interesting_score;
        }
    }

    #[test]
    fn test_scorer_table_is_independent_of_background_table() {
        // background knows "代旭" only through the 美食 rule; the scorer matches "吃"
        let idea = score_topic("代旭吃醋", 0);
        assert_eq!(idea.product_name, "美食侦探");
        assert_eq!(idea.background.related_parties[0], "代旭");
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = score_topic("王安宇新剧", 1_234_567);
        let b = score_topic("王安宇新剧", 1_234_567);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_table_has_ten_categories() {
        assert_eq!(IDEA_RULES.len(), 10);
    }

    fn is_fallback(idea: &IdeaRecord) -> bool {
        !IDEA_RULES
            .iter()
            .any(|r| r.payload.product_name == idea.product_name)
    }

    #[test]
    fn test_every_keyword_selects_a_category() {
        for rule in IDEA_RULES {
            for k in rule.keywords {
                assert_eq!(*k, k.to_lowercase(), "keyword {k}");
                let name = format!("{k}相关话题");
                let idea = score_topic(&name, 0);
                let expected = first_match(IDEA_RULES, &name).map(|t| t.product_name);
                assert_eq!(Some(idea.product_name.as_str()), expected, "topic {name}");
                assert!(!is_fallback(&idea), "topic {name}");
            }
        }
    }

    #[test]
    fn test_scorer_fallback_iff_no_keyword() {
        for name in [
            "IPHONE手机发布",
            "Ai芯片突破",
            "AI",
            "NBA总冠军",
            "周末去哪儿",
            "随便看看",
            "",
        ] {
            let lowered = name.to_lowercase();
            let any = IDEA_RULES.iter().any(|r| r.matches(&lowered));
            let idea = score_topic(name, 0);
            assert_eq!(any, !is_fallback(&idea), "topic {name}");
        }
        assert_eq!(score_topic("IPHONE手机发布", 0).product_name, "数码尝鲜派");
        assert!(is_fallback(&score_topic("AI", 0)));
    }
}
