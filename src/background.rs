//! Background lookup for hot-search topics.
//!
//! Despite the name this never searches anything: a topic is matched against a
//! fixed table of keyword rules and the canned context of the first matching
//! rule is returned. Topics that match no rule get a generic narrative that
//! mentions the topic by name.

use crate::models::BackgroundRecord;
use crate::rules::{first_match, KeywordRule};

/// Static payload of a background rule.
#[derive(Debug)]
pub struct BackgroundTemplate {
    pub summary: &'static str,
    pub timeline: &'static [&'static str],
    pub status: &'static str,
    pub discussion_focus: &'static [&'static str],
    pub related_parties: &'static [&'static str],
}

impl BackgroundTemplate {
    fn to_record(&self) -> BackgroundRecord {
        BackgroundRecord {
            summary: self.summary.to_string(),
            timeline: to_strings(self.timeline),
            status: self.status.to_string(),
            discussion_focus: to_strings(self.discussion_focus),
            related_parties: to_strings(self.related_parties),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub static BACKGROUND_RULES: &[KeywordRule<BackgroundTemplate>] = &[
    KeywordRule {
        keywords: &["国考", "申论", "公务员"],
        payload: BackgroundTemplate {
            summary: "2026年国家公务员考试笔试成绩陆续公布，考生们开始查询成绩并准备面试环节。国考作为每年最受关注的公务员考试之一，竞争激烈程度逐年上升。",
            timeline: &[
                "2025年11月：国考笔试举行",
                "2025年12月：笔试成绩查询开启",
                "2026年1月：面试公告发布，考生准备面试",
                "2026年2-4月：各部委陆续组织面试",
            ],
            status: "成绩查询高峰期，面试准备阶段",
            discussion_focus: &["笔试分数线", "面试技巧", "岗位竞争比", "备考经验分享"],
            related_parties: &["备考学生", "培训机构", "人事部门", "各大高校"],
        },
    },
    KeywordRule {
        keywords: &["携程", "垄断"],
        payload: BackgroundTemplate {
            summary: "有用户或机构指控携程在在线旅游市场存在垄断行为，引发监管部门关注和公众讨论。",
            timeline: &[
                "用户投诉：价格歧视、大数据杀熟",
                "媒体报道：平台规则争议",
                "监管部门：启动调查程序",
                "携程回应：调整相关政策",
            ],
            status: "舆论发酵中，等待官方调查结果",
            discussion_focus: &["平台责任", "消费者权益", "价格透明", "监管政策"],
            related_parties: &["携程平台", "消费者", "监管部门", "竞争对手"],
        },
    },
    KeywordRule {
        keywords: &["经济", "工作", "重点任务"],
        payload: BackgroundTemplate {
            summary: "政府发布年度经济工作重点任务，涵盖8大攻坚方向，为全年经济发展指明方向。",
            timeline: &[
                "中央经济工作会议召开",
                "8大重点任务发布",
                "各部委解读政策",
                "地方政府响应落实",
            ],
            status: "政策解读和传播阶段",
            discussion_focus: &["政策红利", "投资机会", "行业发展方向", "民生影响"],
            related_parties: &["政府部门", "企业", "投资者", "普通民众"],
        },
    },
    KeywordRule {
        keywords: &["花海", "聊天记录"],
        payload: BackgroundTemplate {
            summary: "某明星或网红在社交平台分享与恋人的聊天记录（'花海'相关话题），引发粉丝和网友热议。",
            timeline: &[
                "当事人发布聊天记录截图",
                "网友扒出更多细节",
                "粉丝反应两极分化",
                "媒体跟进报道",
            ],
            status: "话题热度持续发酵",
            discussion_focus: &["明星恋情", "隐私保护", "网络暴力", "粉丝文化"],
            related_parties: &["当事人", "粉丝群体", "媒体", "网友"],
        },
    },
    KeywordRule {
        keywords: &["河南", "教师", "学生"],
        payload: BackgroundTemplate {
            summary: "河南某学校教师被曝与学生发生不正当关系，引发社会对师德师风和校园安全的关注。",
            timeline: &["事件被曝光", "教育部门介入调查", "涉事教师被处理", "学校加强管理"],
            status: "调查处理阶段",
            discussion_focus: &["师德规范", "校园安全", "未成年人保护", "监管责任"],
            related_parties: &["涉事教师", "学生家长", "教育部门", "学校"],
        },
    },
    KeywordRule {
        keywords: &["汪苏泷", "代言", "mlb"],
        payload: BackgroundTemplate {
            summary: "歌手汪苏泷被任命为MLB（美国职业棒球大联盟）潮流品牌代言人，引发粉丝关注。",
            timeline: &["MLB官方官宣代言人", "粉丝期待和讨论", "周边产品发售", "品牌合作推广"],
            status: "代言人官宣和推广期",
            discussion_focus: &["代言效果", "品牌调性", "粉丝购买力", "跨界合作"],
            related_parties: &["汪苏泷", "粉丝", "MLB品牌", "娱乐公司"],
        },
    },
    KeywordRule {
        keywords: &["美食", "吃醋", "代旭"],
        payload: BackgroundTemplate {
            summary: "演员代旭在采访或综艺中谈及感情观，说出'我是配角怎敢吃醋'等金句，引发热议。",
            timeline: &["采访/综艺播出", "金句被截图传播", "网友二创和玩梗", "相关作品受关注"],
            status: "话题传播扩散期",
            discussion_focus: &["演员作品", "感情观讨论", "金句二创", "明星效应"],
            related_parties: &["代旭", "粉丝", "影视作品", "综艺平台"],
        },
    },
    KeywordRule {
        keywords: &["你那儿几点", "王安宇", "周也"],
        payload: BackgroundTemplate {
            summary: "王安宇和周也合作的影视作品发布新物料（'你那儿几点'相关），粉丝期待值高涨。",
            timeline: &["新物料发布", "粉丝互动和讨论", "CP粉狂欢", "路人关注度上升"],
            status: "物料宣发期",
            discussion_focus: &["剧情期待", "演员颜值", "CP感", "播出时间"],
            related_parties: &["王安宇", "周也", "粉丝", "剧方"],
        },
    },
    KeywordRule {
        keywords: &["考试助手", "成绩"],
        payload: BackgroundTemplate {
            summary: "各类考试成绩陆续公布，学生和家长进入查分和志愿填报阶段。",
            timeline: &["考试成绩发布", "分数线公布", "志愿填报准备", "录取结果查询"],
            status: "查分和准备阶段",
            discussion_focus: &["分数线", "志愿填报", "录取率", "专业选择"],
            related_parties: &["学生", "家长", "学校", "教育部门"],
        },
    },
];

/// Generic context for topics no rule recognizes.
fn fallback(topic: &str) -> BackgroundRecord {
    BackgroundRecord {
        summary: format!("话题'{}'登上微博热搜，引发网友广泛关注和讨论。", topic),
        timeline: to_strings(&["话题首次出现", "热度快速上升", "引发广泛讨论", "形成舆论热点"]),
        status: "话题传播期".to_string(),
        discussion_focus: to_strings(&["事件真相", "各方观点", "后续发展", "社会影响"]),
        related_parties: to_strings(&["当事人", "网友", "媒体", "相关部门"]),
    }
}

/// Attach canned background context to a topic name.
///
/// Total over all inputs, including the empty string. No I/O.
pub fn resolve(topic: &str) -> BackgroundRecord {
    match first_match(BACKGROUND_RULES, topic) {
        Some(template) => template.to_record(),
        None => {
            tracing::debug!(topic, "No background rule matched; using generic context");
            fallback(topic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_service_rule() {
        let bg = resolve("国考成绩查询");
        assert!(bg.summary.starts_with("2026年国家公务员考试"));
        assert_eq!(bg.timeline.len(), 4);
        assert_eq!(bg.status, "成绩查询高峰期，面试准备阶段");
    }

    #[test]
    fn test_earlier_rule_takes_precedence() {
        // "成绩" alone belongs to the last rule, but "国考" comes first
        let bg = resolve("国考成绩");
        assert_eq!(bg.related_parties[0], "备考学生");

        let bg = resolve("高考成绩");
        assert_eq!(bg.status, "查分和准备阶段");
    }

    #[test]
    fn test_uppercase_keyword_matches_any_case() {
        assert_eq!(resolve("MLB新品").status, "代言人官宣和推广期");
        assert_eq!(resolve("mlb新品").status, "代言人官宣和推广期");
    }

    #[test]
    fn test_fallback_mentions_topic() {
        let bg = resolve("无关话题XYZ");
        assert_eq!(bg.summary, "话题'无关话题XYZ'登上微博热搜，引发网友广泛关注和讨论。");
        assert_eq!(bg.status, "话题传播期");
    }

    #[test]
    fn test_empty_topic_uses_fallback() {
        let bg = resolve("");
        assert_eq!(bg.status, "话题传播期");
        assert_eq!(bg.discussion_focus.len(), 4);
    }

    #[test]
    fn test_fallback_iff_no_keyword() {
        for name in ["携程被约谈", "经济数据", "花海", "河南暴雨", "美食节", "周也新剧", "随便看看"] {
            let lowered = name.to_lowercase();
            let any = BACKGROUND_RULES.iter().any(|r| r.matches(&lowered));
            let is_fallback = resolve(name).status == "话题传播期";
            assert_eq!(any, !is_fallback, "topic {name}");
        }
    }

    #[test]
    fn test_keywords_are_stored_lowercase() {
        for rule in BACKGROUND_RULES {
            for k in rule.keywords {
                assert_eq!(*k, k.to_lowercase(), "keyword {k}");
            }
        }
    }
}
