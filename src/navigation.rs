//! This file defines the templates and a convenience function for creating
//! the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to `true`. Only one link
/// should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( li { a href=(self.url) class=(style) { (self.title) } } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be marked as
    /// active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::TRACKER_VIEW,
                title: "Tracker",
                is_current: active_endpoint == endpoints::TRACKER_VIEW,
            },
            Link {
                url: endpoints::ANALYTICS_VIEW,
                title: "Analytics",
                is_current: active_endpoint == endpoints::ANALYTICS_VIEW,
            },
            Link {
                url: endpoints::REPORTS_VIEW,
                title: "Reports",
                is_current: active_endpoint == endpoints::REPORTS_VIEW,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html! {
            nav class="bg-white border-gray-200 dark:bg-gray-900 w-full"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse text-2xl font-semibold text-gray-900 dark:text-white"
                    {
                        "💰 SpendWise"
                    }

                    ul class="font-medium flex flex-row items-center space-x-4 lg:space-x-8 rtl:space-x-reverse"
                    {
                        @for nav_link in self.links {
                            (nav_link.into_html())
                        }

                        li {
                            a
                                href=(endpoints::LOG_OUT)
                                class="block py-2 px-3 text-gray-500 rounded-sm hover:bg-gray-100
                                    lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
                                    dark:text-gray-400 lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
                                    dark:hover:text-white lg:dark:hover:bg-transparent"
                            {
                                "Log out"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::endpoints;

    use super::NavBar;

    #[test]
    fn contains_links_to_all_pages() {
        let markup = NavBar::new(endpoints::DASHBOARD_VIEW).into_html().into_string();

        for endpoint in [
            endpoints::DASHBOARD_VIEW,
            endpoints::TRACKER_VIEW,
            endpoints::ANALYTICS_VIEW,
            endpoints::REPORTS_VIEW,
            endpoints::LOG_OUT,
        ] {
            assert!(
                markup.contains(&format!("href=\"{endpoint}\"")),
                "nav bar should link to {endpoint}"
            );
        }
    }
}
