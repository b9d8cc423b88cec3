macro_rules! catalog {
    ($($variant:ident => ($zh:expr, $en:expr)),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Msg {
            $($variant),*
        }

        impl Msg {
            pub fn zh(self) -> &'static str {
                match self {
                    $(Msg::$variant => $zh),*
                }
            }

            pub fn en(self) -> &'static str {
                match self {
                    $(Msg::$variant => $en),*
                }
            }
        }
    };
}

catalog! {
    App => ("Moon 监控", "Moon Monitor"),

    MenuMonitor => ("监控", "Monitor"),
    MenuDashboard => ("监控大盘", "Dashboard"),
    MenuAlarm => ("实时告警", "Alarm"),
    MenuDatasource => ("数据源", "Datasource"),
    MenuDatasourceMetric => ("指标", "Metric"),
    MenuStrategy => ("策略", "Strategy"),
    MenuStrategyGroup => ("策略组", "Group"),
    MenuStrategyList => ("策略列表", "List"),
    MenuTeam => ("团队", "Team"),
    PageNotFound => ("页面不存在", "Page not found"),
    DashboardPlaceholder => ("暂无大盘数据", "No dashboard panels yet"),
    RedirectingToLogin => ("未登录，即将跳转登录页", "Not signed in, redirecting to login"),

    NetError => ("NET_ERROR", "NET_ERROR"),
    NetworkAnomaly => ("网络异常", "network anomaly"),
    ValidationFailedTitle => ("请求参数错误", "Request validation failed"),
    ConfirmRequiredTitle => ("操作需要确认", "Confirmation required"),
    Cancel => ("取消", "Cancel"),
    Confirm => ("确定", "Confirm"),
    Operation => ("操作", "Operation"),
    Empty => ("暂无数据", "No data"),
    Loading => ("加载中", "Loading"),
    Submitting => ("提交中", "Submitting"),
    Ready => ("就绪", "Ready"),
    IssuesRemaining => ("项待修正", "issue(s) remaining"),
    SearchPlaceholder => ("搜索", "Search"),
    PendingExit => ("存在未保存的修改，再次按 Ctrl+Q 退出", "Unsaved changes. Press Ctrl+Q again to quit"),
    TeamSwitched => ("已切换团队", "Switched team"),
    NoTeam => ("未选择团队", "No team selected"),
    CaptchaImage => ("图形验证码已获取，Ctrl+R 刷新", "Image captcha received, Ctrl+R to refresh"),
    CaptchaPending => ("正在获取验证码", "Fetching captcha"),
    Yes => ("是", "Yes"),
    No => ("否", "No"),

    CreateStrategy => ("创建策略", "Create strategy"),
    EditStrategy => ("编辑策略", "Edit strategy"),
    CreateStrategyGroup => ("创建策略组", "Create strategy group"),
    EditStrategyGroup => ("编辑策略组", "Edit strategy group"),
    CreateDatasource => ("新建数据源", "Create datasource"),
    EditDatasource => ("编辑数据源", "Edit datasource"),
    CreateTeam => ("创建团队", "Create team"),
    EditTeam => ("编辑团队", "Edit team"),
    EditPermissions => ("高级权限编辑", "Advanced permission editor"),
    Login => ("登录", "Login"),

    FieldId => ("ID", "ID"),
    FieldName => ("名称", "Name"),
    FieldRemark => ("备注", "Remark"),
    FieldStatus => ("状态", "Status"),
    FieldCategories => ("分类", "Categories"),
    FieldGroup => ("策略组", "Strategy group"),
    FieldSourceType => ("数据源类型", "Source type"),
    FieldDatasources => ("数据源", "Datasources"),
    FieldExpr => ("表达式", "Expression"),
    FieldStep => ("采样率", "Step"),
    FieldLabels => ("标签", "Labels"),
    FieldSummary => ("告警摘要", "Summary"),
    FieldDescription => ("告警明细", "Description"),
    FieldDuration => ("持续时间", "Duration"),
    FieldInterval => ("检测间隔", "Interval"),
    FieldCount => ("持续次数", "Count"),
    FieldSustainType => ("持续类型", "Sustain type"),
    FieldCondition => ("判断条件", "Condition"),
    FieldThreshold => ("阈值", "Threshold"),
    FieldAlarmLevel => ("告警等级", "Alarm level"),
    FieldAlarmGroups => ("告警组", "Alarm groups"),
    FieldAlarmPages => ("告警页面", "Alarm pages"),
    FieldLabelName => ("标签名", "Label name"),
    FieldLabelValue => ("标签值", "Label value"),
    FieldEndpoint => ("数据源地址", "Endpoint"),
    FieldStorageType => ("存储类型", "Storage type"),
    FieldDatasourceType => ("数据源类型", "Datasource type"),
    FieldLogo => ("团队图标", "Logo"),
    FieldUsername => ("用户名", "Username"),
    FieldPassword => ("密码", "Password"),
    FieldCaptcha => ("验证码", "Captcha"),
    FieldRememberMe => ("记住我", "Remember me"),
    FieldRole => ("角色", "Role"),
    FieldPermissions => ("权限", "Permissions"),
    FieldLabelNotices => ("标签通知", "Label notice"),
    AddLevel => ("+ 添加策略等级", "+ Add strategy level"),
    AddLabel => ("+ 添加标签", "+ Add label"),
    AddLabelNotice => ("+ 添加标签通知", "+ Add label notice"),

    ErrNameRequired => ("请输入名称", "Name is required"),
    ErrNameMax => ("名称最多20字符", "Name cannot exceed 20 characters"),
    ErrRemarkMax255 => ("备注最多255字符", "Remark cannot exceed 255 characters"),
    ErrRemarkMax200 => ("备注信息最多200字符", "Remark cannot exceed 200 characters"),
    ErrEndpointRequired => ("请输入数据源地址", "Endpoint is required"),
    ErrLogoMax => ("图标地址最多255字符", "Logo URL cannot exceed 255 characters"),
    ErrDurationPattern => ("持续时间格式为数字加s，例如30s", "Duration must look like 30s"),
    ErrIntervalPattern => ("检测间隔格式为数字加s，例如10s", "Interval must look like 10s"),
    ErrCountMin => ("持续次数不能小于0", "Count cannot be negative"),
    ErrThresholdNumber => ("阈值必须是有效数字", "Threshold must be a finite number"),
    ErrNumberExpected => ("请输入数字", "A number is required"),
    ErrInvalidValue => ("取值无效", "Invalid value"),
    ErrUsernameMin => ("用户名不能为空", "The username cannot be empty"),
    ErrUsernameMax => ("用户名最多20字符", "The username cannot exceed 20 characters"),
    ErrPasswordMin => ("密码不能为空", "The password cannot be empty"),
    ErrPasswordMax => ("密码最多20字符", "The password length cannot exceed 20 characters"),
    ErrCaptchaMin => ("验证码不能为空", "Captcha cannot be empty"),
    ErrCaptchaMax => ("验证码最多10字符", "Captcha length cannot exceed 10 characters"),
    ErrCaptchaMissing => ("请先获取验证码", "Fetch a captcha first"),
    ErrRoleRequired => ("请选择一个角色", "Select a role"),
    ErrPermissionsMin => ("请至少选择一个权限", "Select at least one permission"),

    StatusAll => ("全部", "All"),
    StatusEnable => ("启用", "Enabled"),
    StatusDisable => ("禁用", "Disabled"),
    ConditionEq => ("等于(==)", "Equal (==)"),
    ConditionNe => ("不等于(!=)", "Not equal (!=)"),
    ConditionGt => ("大于(>)", "Greater (>)"),
    ConditionGte => ("大于等于(>=)", "Greater or equal (>=)"),
    ConditionLt => ("小于(<)", "Less (<)"),
    ConditionLte => ("小于等于(<=)", "Less or equal (<=)"),
    SustainFor => ("m时间内出现n次", "n times within m"),
    SustainMax => ("m时间内最多出现n次", "at most n times within m"),
    SustainMin => ("m时间内最少出现n次", "at least n times within m"),
    DatasourceMetric => ("Metric", "Metric"),
    DatasourceLog => ("Log", "Log"),
    DatasourceTrace => ("Trace", "Trace"),
    StoragePrometheus => ("Prometheus", "Prometheus"),
    StorageVictoriaMetrics => ("VictoriaMetrics", "VictoriaMetrics"),
}
