/// Built-in keyword replies, in match order.
pub const DEFAULT_KEYWORD_RESPONSES: &[(&str, &str)] = &[
    // English
    ("hello", "Hello there! How can I help you?"),
    ("hi", "Hi! How are you doing?"),
    ("help", "If you need help, you can use the /help command."),
    ("thank you", "You're welcome!"),
    ("thanks", "You're welcome!"),
    ("rules", "Please read the group rules pinned in the group."),
    ("group rules", "The group rules can be found in the pinned messages."),
    // 问候
    ("你好", "你好呀！有什么我可以帮忙的吗？"),
    ("嗨", "嗨！你好吗？"),
    ("早上好", "早上好！祝你有个美好的一天~"),
    ("中午好", "中午好！记得吃午饭哦~"),
    ("晚上好", "晚上好！今天过得怎么样？"),
    ("晚安", "晚安！祝你有个甜美的梦~"),
    ("新年快乐", "新年快乐！祝你在新的一年里万事如意！"),
    ("元旦快乐", "元旦快乐！新的一年，新的开始！"),
    ("春节快乐", "春节快乐！恭喜发财，红包拿来！🧧"),
    // 帮助
    ("帮助", "如果你需要帮助，可以使用 /help 命令查看所有可用命令。"),
    ("使用说明", "使用 /help 命令可以查看机器人的所有功能和使用方法。"),
    ("怎么用", "你可以使用 /help 命令查看所有功能，或者直接问我具体问题。"),
    ("功能", "本机器人提供群组管理、信息查询、自动回复等功能，使用 /help 查看详情。"),
    // 感谢
    ("谢谢", "不客气，很高兴能帮到你！"),
    ("感谢", "不客气！"),
    ("太棒了", "谢谢夸奖，我会继续努力的！"),
    ("好用", "谢谢！我们一直在努力改进~"),
    // 群规
    ("规则", "请阅读群组内置顶的群组规则。违反规则可能会被警告或封禁。"),
    ("群规", "群组规则可以在置顶消息中找到。请大家共同维护良好的群组环境！"),
    ("禁言", "违反群规的用户可能会被禁言，请大家文明发言，共同维护良好的交流环境。"),
    ("举报", "如果发现有人违反群规，请联系群组管理员进行举报。"),
    // 群组信息
    ("群组信息", "使用 /stats 命令可以查看当前群组的详细信息。"),
    ("群统计", "使用 /stats 命令可以查看群组统计信息，包括成员数量等数据。"),
    ("活动", "群组活动信息会定期在公告中发布，请留意置顶消息。"),
    ("管理员", "如需联系管理员，请在消息中@管理员或私信他们。"),
    // 机器人
    ("机器人", "我是一个群管理机器人，可以帮助管理群组、回答问题和提供各种服务。"),
    ("指令", "使用 /help 命令可以查看所有可用的指令列表。"),
    ("命令", "我支持多种命令，如 /start, /help, /ban, /stats 等，详情请查看 /help。"),
    // 其他
    ("怎么加入", "想加入本群组，请联系群组管理员获取邀请链接。"),
    ("太安静了", "是有点安静呢，不如分享一些有趣的话题，活跃一下群组氛围吧！"),
    ("闲聊", "闲聊是允许的，但请遵守群规，保持友善和尊重。"),
    ("笑话", "抱歉，我不会讲笑话，但你可以在群里分享有趣的事情！"),
];
