//! SOQL for the three record sets the scorer needs.

use chrono::NaiveDate;

const LINE_ITEMS: &str = "(SELECT Id, Product2.Name, Product2.Family, Quantity, UnitPrice, TotalPrice \
     FROM OpportunityLineItems LIMIT 200)";

pub fn closed_won(since: NaiveDate) -> String {
    format!(
        "SELECT Id, Name, Account.Id, Account.Name, Professional_Services_Amount__c, \
         StageName, CloseDate, CreatedDate, Owner.Name, IsWon, IsClosed, {LINE_ITEMS} \
         FROM Opportunity \
         WHERE IsWon = TRUE AND IsClosed = TRUE AND CloseDate >= {since} \
         AND Professional_Services_Amount__c != NULL AND Professional_Services_Amount__c > 0 \
         ORDER BY CloseDate DESC",
        since = since.format("%Y-%m-%d")
    )
}

pub fn closed_lost(since: NaiveDate) -> String {
    format!(
        "SELECT Id, Account.Id, Account.Name, StageName, CloseDate, IsWon, IsClosed \
         FROM Opportunity \
         WHERE IsWon = FALSE AND IsClosed = TRUE AND StageName = 'Closed Lost' \
         AND CloseDate >= {since} \
         ORDER BY CloseDate DESC",
        since = since.format("%Y-%m-%d")
    )
}

pub fn open_pipeline() -> String {
    format!(
        "SELECT Id, Name, Account.Id, Account.Name, Professional_Services_Amount__c, \
         StageName, Sales_Commit__c, CloseDate, CreatedDate, Owner.Name, {LINE_ITEMS} \
         FROM Opportunity \
         WHERE IsClosed = FALSE \
         AND StageName NOT IN ('Closed Won', 'Closed Lost', 'Disqualified') \
         AND Professional_Services_Amount__c != NULL AND Professional_Services_Amount__c > 0 \
         ORDER BY Professional_Services_Amount__c DESC NULLS LAST"
    )
}
