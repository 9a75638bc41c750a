mod automation;
mod consumption;
mod firms;
mod income;
mod taxation;
