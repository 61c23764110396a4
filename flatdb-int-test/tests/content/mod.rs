mod navigation_test;
mod route_test;
