//! Built-in defaults catalog
//!
//! Every section and option the daemon and its clients know about, with the
//! value used when the config file does not set it. Read-only options are
//! fixed at build time and rejected from the config file.

use crate::config::catalog::{OptionSpec, SectionSpec};
use crate::config::value::ValueKind;

/// Default location of the config file.
pub const CFG_FILE: &str = "/etc/setroubleshoot/setroubleshoot.conf";

/// Environment variable overriding [`CFG_FILE`].
pub const CFG_FILE_ENV: &str = "SETROUBLESHOOT_CONFIG";

const NOTIFICATION_DESCRIPTION: &str = concat!(
    "Control balloon notification. Possible values: always,never,browser_hidden \"always\" will\n",
    "always display the notification. \"never\" disables notification completely. \"browser_hidden\" displays the notification\n",
    "but only if the alert browser is not visible. Note: individual alerts can be flagged as silent disabling notification\n",
    "for a specific alert, this parameter does not override that.",
);

const MAX_ALERTS_DESCRIPTION: &str = concat!(
    "\n",
    "Keep no more than this many alerts in the database. Oldest alerts based on\n",
    "the alert's last seen date will be purged first. Zero implies no limit",
);

const MAX_ALERT_AGE_DESCRIPTION: &str = concat!(
    "\n",
    "Purge any alerts whose age based on it's last seen date exceeds this threshold.\n",
    "Age may be specified as a sequence of integer unit pairs. Units may be one of\n",
    "year,month,week,day,hour,minute,second and may optionally be plural.\n",
    "Example: '2 weeks 1 day' sets the threshold at 15 days.\n",
    "An empty string implies no limit",
);

const ADDRESS_LIST_DESCRIPTION: &str = concat!(
    "\n",
    "List of socket addresses server should listen on for client\n",
    "connections. Addresses should not contain any whitespace. Each address\n",
    "is of the form \"[{family}]address[:port]\" where [] indicates the value\n",
    "is optional. Valid values for family are inet or unix, if the family\n",
    "is absent it defaults to inet. If the family is unix the address is\n",
    "interpreted as a file path. If the family is inet the address is\n",
    "interpreted as either a host name or IP address. As a special case if\n",
    "the inet address is \"hostname\" the current hostname will be\n",
    "substituted. If the family is inet the address may optionally be\n",
    "followed by a colon (:) and a port number. If the port number is\n",
    "absent in the address it defaults to the port specified in this config\n",
    "section. Example, to listen on the local unix domain socket and\n",
    "provide remote connections use this \"{unix}%(path)s, hostname\"\n",
);

const LOG_LEVEL_DESCRIPTION: &str = concat!(
    "\n",
    "Global logging level. Levels are the same as in the python logging\n",
    "module, but are case insenstive. The level may also be specified as an\n",
    "integer. The defined levels in severity order are:[CRITICAL, ERROR,\n",
    "WARNING, INFO, DEBUG]",
);

const LOG_CATEGORIES_DESCRIPTION: &str = concat!(
    "\n",
    "Comma seperated list of logging categories. Each categories may\n",
    "optionally be followed by a colon(:) and a logging level, which either\n",
    "may be one of the symbolic levels or numeric, e.g. ipc:info. If no\n",
    "level is defined the default level is used. If the category name is\n",
    "preceded by a tilde (~) the category is not logged at all.\n",
    "The list of available categories is: [rpc, xml, cfg, alert, sig, plugin, avc, email, gui, gui_data, program, database, server, dbus, stats, communication, subprocess]",
);

const FILEMODE_DESCRIPTION: &str = "should be \"w\" or \"a\" for write or append respectively";

const CLIENT_USERS_DESCRIPTION: &str = concat!(
    "\n",
    "Comma-separated list of users allowed to run the client and connect to\n",
    "the local fault server and therefore see security denials.\n",
    "Also accepts '*' to allow all users to connect.",
);

const FIX_CMD_USERS_DESCRIPTION: &str = concat!(
    "\n",
    "Comma-separated list of users allowed to run the fix commands with\n",
    "root privileges. Members of this list can execute the fix commands\n",
    "specified in any alert. The command is executed with root privileges\n",
    "so you should be very caeful who you add to this list as you are\n",
    "granting them significant power to alter the security settings of this\n",
    "system. The wildcard '*' is NOT allowed.",
);

const LOG_FORMAT: &str = "%(asctime)s [%(name)s.%(levelname)s] %(message)s";
const DBUS_NAME: &str = "org.fedoraproject.Setroubleshootd";
const DBUS_PATH: &str = "/org/fedoraproject/Setroubleshootd";
const DBUS_INTERFACE: &str = "org.fedoraproject.SetroubleshootdIface";
const SERVER_SOCKET: &str = "/var/run/setroubleshoot/setroubleshoot_server";

const GENERAL: &[OptionSpec] = &[
    OptionSpec::new("pid_file", "/var/run/setroubleshootd.pid", ""),
    OptionSpec::new("pkg_name", "setroubleshoot", "").read_only(),
    OptionSpec::new("pkg_version", "3.0.47", "").read_only(),
    OptionSpec::new(
        "project_url",
        "http://hosted.fedoraproject.org/projects/setroubleshoot",
        "URL of project website",
    ),
    OptionSpec::new("rpc_version", "1.1", "").read_only(),
    OptionSpec::new(
        "i18n_text_domain",
        "setroubleshoot",
        "internationalization (i18n) translation catalog",
    )
    .read_only(),
    OptionSpec::new(
        "i18n_locale_dir",
        "/usr/share/locale",
        "internationalization (i18n) translation catalog directory",
    )
    .read_only(),
    OptionSpec::new(
        "i18n_encoding",
        "utf-8",
        "internationalization (i18n) encoding (codeset)",
    )
    .read_only(),
    OptionSpec::new("data_dir", "/usr/share/setroubleshoot", "").read_only(),
    OptionSpec::new("config_dir", "/etc/setroubleshoot", "").read_only(),
    OptionSpec::new("use_auparse", "False", "").kind(ValueKind::Boolean),
    OptionSpec::new("icon_name", "setroubleshoot_icon", "").read_only(),
];

const HELPER_APPS: &[OptionSpec] = &[OptionSpec::new(
    "web_browser_launcher",
    "/usr/bin/xdg-open",
    "Helper application to launch web browser on a URL",
)];

const AUDIT: &[OptionSpec] = &[
    OptionSpec::new(
        "binary_protocol_socket_path",
        "/var/run/audit_events",
        "unix domain socket used to listen for audit messages (binary audit protocol)",
    ),
    OptionSpec::new(
        "text_protocol_socket_path",
        "/var/run/audispd_events",
        "unix domain socket used to listen for audit messages (textural audit protocol)",
    ),
    OptionSpec::new(
        "retry_interval",
        "60",
        "number of seconds to wait before trying to connect to audit socket again in the event of socket failure",
    )
    .kind(ValueKind::Integer),
];

const ALERT: &[OptionSpec] = &[OptionSpec::new(
    "use_notification",
    "always",
    NOTIFICATION_DESCRIPTION,
)];

const PLUGINS: &[OptionSpec] = &[OptionSpec::new(
    "plugin_dir",
    "/usr/share/setroubleshoot/plugins",
    "",
)];

const DBUS: &[OptionSpec] = &[
    OptionSpec::new("bus_name", DBUS_NAME, "").read_only(),
    OptionSpec::new("object_path", DBUS_PATH, "").read_only(),
    OptionSpec::new("interface", DBUS_INTERFACE, "").read_only(),
];

const DATABASE: &[OptionSpec] = &[
    OptionSpec::new("database_dir", "/var/lib/setroubleshoot", ""),
    OptionSpec::new("filename", "setroubleshoot", ""),
    OptionSpec::new("max_alerts", "50", MAX_ALERTS_DESCRIPTION).kind(ValueKind::Integer),
    OptionSpec::new("max_alert_age", "", MAX_ALERT_AGE_DESCRIPTION),
];

const CONNECTION: &[OptionSpec] = &[
    // TODO: replace with the port registered for the daemon once one is assigned
    OptionSpec::new("default_port", "69783", "").kind(ValueKind::Integer),
];

const LISTEN_FOR_CLIENT: &[OptionSpec] = &[
    OptionSpec::new("path", SERVER_SOCKET, ""),
    OptionSpec::new("address_list", "{unix}%(path)s", ADDRESS_LIST_DESCRIPTION),
];

const CLIENT_CONNECT_TO: &[OptionSpec] = &[
    OptionSpec::new("path", SERVER_SOCKET, ""),
    OptionSpec::new(
        "address_list",
        "{unix}%(path)s hostname",
        ADDRESS_LIST_DESCRIPTION,
    ),
];

const SOCKET: &[OptionSpec] = &[
    OptionSpec::new("buf_size", "2048", "")
        .read_only()
        .kind(ValueKind::Integer),
    OptionSpec::new("timeout", "5", "")
        .read_only()
        .kind(ValueKind::Integer),
];

const SETROUBLESHOOTD_LOG: &[OptionSpec] = &[
    OptionSpec::new("level", "warning", LOG_LEVEL_DESCRIPTION),
    OptionSpec::new("categories", "", LOG_CATEGORIES_DESCRIPTION),
    OptionSpec::new(
        "filename",
        "/var/log/setroubleshoot/setroubleshootd.log",
        "",
    ),
    OptionSpec::new("filemode", "w", FILEMODE_DESCRIPTION),
    OptionSpec::new("format", LOG_FORMAT, ""),
    OptionSpec::new("console", "False", "True|False, also log to the console")
        .kind(ValueKind::Boolean),
    OptionSpec::new("profile", "False", "True|False, gather statistics")
        .kind(ValueKind::Boolean),
];

const SEALERT_LOG: &[OptionSpec] = &[
    OptionSpec::new("level", "warning", LOG_LEVEL_DESCRIPTION),
    OptionSpec::new("categories", "", LOG_CATEGORIES_DESCRIPTION),
    OptionSpec::new("filename", "", ""),
    OptionSpec::new("filemode", "a", FILEMODE_DESCRIPTION),
    OptionSpec::new("format", LOG_FORMAT, ""),
    OptionSpec::new("console", "False", "True|False, also log to the console")
        .kind(ValueKind::Boolean),
    OptionSpec::new("profile", "False", "True|False, gather statistics")
        .kind(ValueKind::Boolean),
];

const ACCESS: &[OptionSpec] = &[
    OptionSpec::new("client_users", "*", CLIENT_USERS_DESCRIPTION),
    OptionSpec::new("fix_cmd_users", "root", FIX_CMD_USERS_DESCRIPTION),
];

const EMAIL: &[OptionSpec] = &[
    OptionSpec::new("smtp_host", "localhost", "The SMTP server address"),
    OptionSpec::new("smtp_port", "25", "The SMTP server port").kind(ValueKind::Integer),
    OptionSpec::new("from_address", "SELinux_Troubleshoot", "The From: email header"),
    OptionSpec::new("subject", "SELinux AVC Alert", "The Subject: email header"),
    OptionSpec::new(
        "recipients_filepath",
        "/var/lib/setroubleshoot/email_alert_recipients",
        "Path name of file with email recipients. One address per line, optionally followed by enable flag. Comment character is #. ",
    ),
];

const HELP: &[OptionSpec] = &[
    OptionSpec::new(
        "help_url",
        "http://hosted.fedoraproject.org/projects/setroubleshoot/wiki/SETroubleShoot%%20User%%20FAQ",
        "URL to user help information",
    ),
    OptionSpec::new(
        "bug_report_url",
        "http://bugzilla.redhat.com/bugzilla/enter_bug.cgi",
        "URL used to report bugs",
    ),
];

const TEST: &[OptionSpec] = &[OptionSpec::new("analyze", "False", "Print plugin report")
    .read_only()
    .kind(ValueKind::Boolean)];

const FIX_CMD: &[OptionSpec] = &[OptionSpec::new(
    "run_fix_cmd_enable",
    "False",
    "Permit running fix commands",
)
.kind(ValueKind::Boolean)];

pub(crate) const CATALOG: &[SectionSpec] = &[
    SectionSpec { name: "general", options: GENERAL },
    SectionSpec { name: "helper_apps", options: HELPER_APPS },
    SectionSpec { name: "audit", options: AUDIT },
    SectionSpec { name: "alert", options: ALERT },
    SectionSpec { name: "plugins", options: PLUGINS },
    SectionSpec { name: "session_dbus", options: DBUS },
    SectionSpec { name: "system_dbus", options: DBUS },
    SectionSpec { name: "database", options: DATABASE },
    SectionSpec { name: "connection", options: CONNECTION },
    SectionSpec { name: "listen_for_client", options: LISTEN_FOR_CLIENT },
    SectionSpec { name: "client_connect_to", options: CLIENT_CONNECT_TO },
    SectionSpec { name: "socket", options: SOCKET },
    SectionSpec { name: "setroubleshootd_log", options: SETROUBLESHOOTD_LOG },
    SectionSpec { name: "sealert_log", options: SEALERT_LOG },
    SectionSpec { name: "access", options: ACCESS },
    SectionSpec { name: "email", options: EMAIL },
    SectionSpec { name: "help", options: HELP },
    SectionSpec { name: "test", options: TEST },
    SectionSpec { name: "fix_cmd", options: FIX_CMD },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogCategory;

    #[test]
    fn test_catalog_sections() {
        let names: Vec<&str> = CATALOG.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 19);
        assert!(names.contains(&"audit"));
        assert!(names.contains(&"fix_cmd"));
    }

    #[test]
    fn test_categories_description_lists_every_category() {
        let listed: Vec<&str> = LogCategory::ALL.iter().map(|c| c.as_str()).collect();
        let expected = format!(
            "The list of available categories is: [{}]",
            listed.join(", ")
        );
        assert!(LOG_CATEGORIES_DESCRIPTION.ends_with(&expected));
    }

    #[test]
    fn test_address_list_references_path() {
        let listen = LISTEN_FOR_CLIENT
            .iter()
            .find(|o| o.name == "address_list")
            .unwrap();
        assert_eq!(listen.default, "{unix}%(path)s");
        assert!(ADDRESS_LIST_DESCRIPTION.ends_with("hostname\"\n"));
    }
}
